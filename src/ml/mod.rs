pub mod prophet;

use chrono::NaiveDate;

use crate::dataset::DailySeries;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid model settings: {0}")]
    InvalidSettings(String),

    #[error("insufficient history: {0}")]
    InsufficientData(String),

    #[error("model fit failed: {0}")]
    Fit(String),

    #[error("prediction failed: {0}")]
    Predict(String),
}

/// A time-series model that can be trained on a daily series.
/// Implementations build a fresh model on every call; nothing is cached.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit(&self, series: &DailySeries) -> Result<Box<dyn FittedModel>, ModelError>;
}

pub trait FittedModel {
    /// Point estimates, one per requested date, in the same order.
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<f64>, ModelError>;
}

/// Fit `forecaster` on the whole series and predict the `periods` days that
/// immediately follow its last date.
pub fn forecast_horizon(
    forecaster: &dyn Forecaster,
    series: &DailySeries,
    periods: u32,
) -> Result<Vec<(NaiveDate, f64)>, ModelError> {
    let last = series
        .last_date()
        .ok_or_else(|| ModelError::InsufficientData("series is empty".into()))?;
    let future: Vec<NaiveDate> = last.iter_days().skip(1).take(periods as usize).collect();

    let model = forecaster.fit(series)?;
    let yhat = model.predict(&future)?;

    if yhat.len() != future.len() {
        return Err(ModelError::Predict(format!(
            "expected {} predictions, model returned {}",
            future.len(),
            yhat.len()
        )));
    }
    if let Some(pos) = yhat.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::Predict(format!(
            "non-finite prediction for {}",
            future[pos]
        )));
    }

    Ok(future.into_iter().zip(yhat).collect())
}
