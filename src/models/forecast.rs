use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    /// Hashtag including its leading `#`, e.g. `#covid19`.
    pub hashtag: String,
    pub periods: i64,
}

impl ForecastRequest {
    /// Column name for the hashtag, i.e. the hashtag without its leading `#`.
    pub fn column(&self) -> Option<&str> {
        self.hashtag.strip_prefix('#').filter(|c| !c.is_empty())
    }
}

/// One predicted day. `yhat` is rounded half-to-even to a whole count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: i64,
}

impl ForecastPoint {
    pub fn from_prediction(ds: NaiveDate, predicted: f64) -> Self {
        Self {
            ds,
            yhat: predicted.round_ties_even() as i64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HashtagList {
    pub hashtags: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hashtag: &str) -> ForecastRequest {
        ForecastRequest {
            hashtag: hashtag.into(),
            periods: 1,
        }
    }

    #[test]
    fn test_column_strips_leading_hash() {
        assert_eq!(request("#covid19").column(), Some("covid19"));
        assert_eq!(request("##covid19").column(), Some("#covid19"));
        assert_eq!(request("covid19").column(), None);
        assert_eq!(request("#").column(), None);
    }

    #[test]
    fn test_rounding() {
        let ds = NaiveDate::from_ymd_opt(2023, 4, 21).unwrap();
        assert_eq!(ForecastPoint::from_prediction(ds, 12.4).yhat, 12);
        assert_eq!(ForecastPoint::from_prediction(ds, 12.6).yhat, 13);
        assert_eq!(ForecastPoint::from_prediction(ds, 2.5).yhat, 2);
        assert_eq!(ForecastPoint::from_prediction(ds, 3.5).yhat, 4);
        assert_eq!(ForecastPoint::from_prediction(ds, -0.4).yhat, 0);
    }

    #[test]
    fn test_serializes_iso_date() {
        let point = ForecastPoint {
            ds: NaiveDate::from_ymd_opt(2023, 4, 21).unwrap(),
            yhat: 7,
        };
        assert_eq!(
            serde_json::to_value(&point).unwrap(),
            serde_json::json!({ "ds": "2023-04-21", "yhat": 7 })
        );
    }
}
