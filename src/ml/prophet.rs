//! Additive trend + seasonality model backed by `augurs` Prophet,
//! optimized with the bundled WASM build of Stan.

use augurs::prophet::{
    wasmstan::WasmstanOptimizer, PredictionData, Prophet, ProphetOptions,
    SeasonalityOption, TrainingData,
};
use chrono::{NaiveDate, NaiveTime};

use super::{FittedModel, Forecaster, ModelError};
use crate::config::ModelConfig;
use crate::dataset::DailySeries;

#[derive(Debug, Clone)]
pub struct ProphetForecaster {
    settings: ModelConfig,
}

impl ProphetForecaster {
    pub fn new(settings: ModelConfig) -> Self {
        Self { settings }
    }

    fn options(&self) -> Result<ProphetOptions, ModelError> {
        let scale = self.settings.changepoint_prior_scale;
        Ok(ProphetOptions {
            yearly_seasonality: SeasonalityOption::Manual(self.settings.yearly_seasonality),
            weekly_seasonality: SeasonalityOption::Manual(self.settings.weekly_seasonality),
            daily_seasonality: SeasonalityOption::Manual(self.settings.daily_seasonality),
            changepoint_prior_scale: scale.try_into().map_err(|_| {
                ModelError::InvalidSettings(format!(
                    "changepoint_prior_scale must be positive, got {scale}"
                ))
            })?,
            ..Default::default()
        })
    }
}

impl Forecaster for ProphetForecaster {
    fn name(&self) -> &'static str {
        "prophet"
    }

    fn fit(&self, series: &DailySeries) -> Result<Box<dyn FittedModel>, ModelError> {
        if series.len() < 2 {
            return Err(ModelError::InsufficientData(format!(
                "need at least 2 days of history, got {}",
                series.len()
            )));
        }

        let ds = series.dates().iter().copied().map(to_timestamp).collect();
        let data = TrainingData::new(ds, series.values().to_vec())
            .map_err(|e| ModelError::Fit(format!("invalid training data: {e}")))?;

        let mut prophet = Prophet::new(self.options()?, WasmstanOptimizer::new());
        prophet
            .fit(data, Default::default())
            .map_err(|e| ModelError::Fit(e.to_string()))?;

        Ok(Box::new(FittedProphet { prophet }))
    }
}

struct FittedProphet {
    prophet: Prophet<WasmstanOptimizer>,
}

impl FittedModel for FittedProphet {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<f64>, ModelError> {
        let future = PredictionData::new(dates.iter().copied().map(to_timestamp).collect());
        let predictions = self
            .prophet
            .predict(Some(future))
            .map_err(|e| ModelError::Predict(e.to_string()))?;
        // uncertainty intervals are not used
        Ok(predictions.yhat.point)
    }
}

/// Midnight UTC of `date`, in Unix seconds.
fn to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_timestamp_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 21).unwrap();
        assert_eq!(to_timestamp(date), 1_682_035_200);
    }

    #[test]
    fn test_options_follow_settings() {
        let forecaster = ProphetForecaster::new(ModelConfig::default());
        let opts = forecaster.options().unwrap();
        assert!(matches!(opts.yearly_seasonality, SeasonalityOption::Manual(true)));
        assert!(matches!(opts.weekly_seasonality, SeasonalityOption::Manual(true)));
        assert!(matches!(opts.daily_seasonality, SeasonalityOption::Manual(false)));
    }

    #[test]
    fn test_rejects_non_positive_prior_scale() {
        let forecaster = ProphetForecaster::new(ModelConfig {
            changepoint_prior_scale: -1.0,
            ..ModelConfig::default()
        });
        assert!(matches!(forecaster.options(), Err(ModelError::InvalidSettings(_))));
    }

    #[test]
    fn test_single_point_history_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 20).unwrap();
        let series = DailySeries::new(Arc::from(vec![date]), Arc::from(vec![3.0]));
        let forecaster = ProphetForecaster::new(ModelConfig::default());
        assert!(matches!(
            forecaster.fit(&series),
            Err(ModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_constant_series_forecast_tracks_constant() {
        let start = NaiveDate::from_ymd_opt(2021, 4, 21).unwrap();
        let dates: Vec<NaiveDate> = start.iter_days().take(730).collect();
        let series = DailySeries::new(Arc::from(dates), Arc::from(vec![40.0; 730]));

        let forecaster = ProphetForecaster::new(ModelConfig::default());
        let result = crate::ml::forecast_horizon(&forecaster, &series, 7).unwrap();

        assert_eq!(result.len(), 7);
        for (_, yhat) in result {
            assert!((yhat - 40.0).abs() < 2.0, "prediction {yhat} strayed from 40");
        }
    }

    #[test]
    fn test_all_zero_series_forecast_near_zero() {
        let start = NaiveDate::from_ymd_opt(2018, 4, 1).unwrap();
        let dates: Vec<NaiveDate> = start.iter_days().take(1846).collect();
        let series = DailySeries::new(Arc::from(dates), Arc::from(vec![0.0; 1846]));

        let forecaster = ProphetForecaster::new(ModelConfig::default());
        let result = crate::ml::forecast_horizon(&forecaster, &series, 5).unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result[0].0, NaiveDate::from_ymd_opt(2023, 4, 21).unwrap());
        for (ds, yhat) in result {
            assert_eq!(yhat.round(), 0.0, "prediction {yhat} for {ds} is not near zero");
        }
    }
}
