use chrono::NaiveDate;

/// Inclusive daily window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days, both bounds included. Zero for an inverted window.
    pub fn len(&self) -> usize {
        let days = (self.end - self.start).num_days() + 1;
        days.max(0) as usize
    }

    /// Row position of `date` in the calendar, if it falls inside the window.
    pub fn offset(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.start).num_days() as usize)
    }

    /// Every date in the window, strictly increasing, no gaps.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(self.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_length() {
        let window = DateWindow::new(ymd(2018, 4, 1), ymd(2023, 4, 20));
        assert_eq!(window.len(), 1846);

        let days = window.days();
        assert_eq!(days.len(), 1846);
        assert_eq!(days[0], ymd(2018, 4, 1));
        assert_eq!(*days.last().unwrap(), ymd(2023, 4, 20));
        assert!(days.windows(2).all(|w| w[1] - w[0] == chrono::Duration::days(1)));
    }

    #[test]
    fn test_offsets_and_bounds() {
        let window = DateWindow::new(ymd(2020, 2, 27), ymd(2020, 3, 2));
        assert_eq!(window.len(), 5);
        assert_eq!(window.offset(ymd(2020, 2, 27)), Some(0));
        assert_eq!(window.offset(ymd(2020, 2, 29)), Some(2));
        assert_eq!(window.offset(ymd(2020, 3, 2)), Some(4));
        assert_eq!(window.offset(ymd(2020, 3, 3)), None);
        assert_eq!(window.offset(ymd(2020, 2, 26)), None);
    }

    #[test]
    fn test_single_day_window() {
        let day = ymd(2021, 6, 1);
        let window = DateWindow::new(day, day);
        assert_eq!(window.len(), 1);
        assert_eq!(window.days(), vec![day]);
    }
}
