use chrono::NaiveDate;

/// Outcome of parsing one raw date cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    /// A later format would have produced a different date.
    pub ambiguous: bool,
}

/// Ordered list of accepted `chrono` formats. The first format that parses
/// wins; later formats are only consulted when every earlier one fails.
///
/// With the default `%d/%m/%Y` then `%m/%d/%Y`, `03/04/2020` is read as
/// 3 April 2020 and flagged ambiguous, while `04/13/2020` only parses
/// month-first and is read as 13 April 2020.
#[derive(Debug, Clone)]
pub struct DateParser {
    formats: Vec<String>,
}

impl DateParser {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn parse(&self, raw: &str) -> Option<ParsedDate> {
        let raw = raw.trim();
        let mut candidates = self
            .formats
            .iter()
            .filter_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok());

        let date = candidates.next()?;
        let ambiguous = candidates.any(|other| other != date);
        Some(ParsedDate { date, ambiguous })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> DateParser {
        DateParser::new(vec!["%d/%m/%Y".into(), "%m/%d/%Y".into()])
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_wins() {
        let parsed = parser().parse("03/04/2020").unwrap();
        assert_eq!(parsed.date, ymd(2020, 4, 3));
        assert!(parsed.ambiguous);
    }

    #[test]
    fn test_month_first_fallback() {
        let parsed = parser().parse("04/13/2020").unwrap();
        assert_eq!(parsed.date, ymd(2020, 4, 13));
        assert!(!parsed.ambiguous);
    }

    #[test]
    fn test_unambiguous_day_first() {
        let parsed = parser().parse(" 25/12/2019 ").unwrap();
        assert_eq!(parsed.date, ymd(2019, 12, 25));
        assert!(!parsed.ambiguous);
    }

    #[test]
    fn test_same_day_and_month_is_not_ambiguous() {
        let parsed = parser().parse("05/05/2021").unwrap();
        assert_eq!(parsed.date, ymd(2021, 5, 5));
        assert!(!parsed.ambiguous);
    }

    #[test]
    fn test_unparsable() {
        assert!(parser().parse("2020-13-45").is_none());
        assert!(parser().parse("not a date").is_none());
        assert!(parser().parse("").is_none());
    }

    #[test]
    fn test_iso_only_when_configured() {
        let iso = DateParser::new(vec!["%Y-%m-%d".into()]);
        assert_eq!(iso.parse("2021-01-02").unwrap().date, ymd(2021, 1, 2));
        assert!(parser().parse("2021-01-02").is_none());
    }
}
