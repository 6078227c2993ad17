use std::time::Instant;

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::ml;
use crate::models::{ForecastPoint, ForecastRequest};

pub async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<Vec<ForecastPoint>>, AppError> {
    let Json(request) = payload?;

    let column = request.column().ok_or_else(|| {
        AppError::bad_request(format!(
            "hashtag must start with '#', got '{}'",
            request.hashtag
        ))
    })?;
    let periods = validate_periods(request.periods, state.limits.max_periods)?;
    let series = state
        .dataset
        .series(column)
        .ok_or_else(|| AppError::unknown_hashtag(&request.hashtag))?;

    let permit = state
        .fit_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| AppError::service_unavailable("Forecasting"))?;

    let started = Instant::now();
    let forecaster = state.forecaster.clone();
    let mut in_flight = InFlightFit::new(&request.hashtag);
    // the permit lives as long as the fit, even if this request is dropped
    let fitted = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        ml::forecast_horizon(forecaster.as_ref(), &series, periods)
    })
    .await;
    in_flight.finish();
    let predictions = fitted.map_err(anyhow::Error::from)??;

    tracing::info!(
        hashtag = %request.hashtag,
        periods,
        model = state.forecaster.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Generated forecast"
    );

    Ok(Json(
        predictions
            .into_iter()
            .map(|(ds, yhat)| ForecastPoint::from_prediction(ds, yhat))
            .collect(),
    ))
}

/// Warns when a request goes away while its fit is still running on the
/// blocking pool.
struct InFlightFit<'a> {
    hashtag: &'a str,
    finished: bool,
}

impl<'a> InFlightFit<'a> {
    fn new(hashtag: &'a str) -> Self {
        Self { hashtag, finished: false }
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for InFlightFit<'_> {
    fn drop(&mut self) {
        if !self.finished && !std::thread::panicking() {
            tracing::warn!(
                hashtag = %self.hashtag,
                "Request dropped before its fit finished; the fit keeps its permit until done"
            );
        }
    }
}

fn validate_periods(periods: i64, max_periods: u32) -> Result<u32, AppError> {
    if periods <= 0 {
        return Err(AppError::bad_request(format!(
            "periods must be a positive integer, got {periods}"
        )));
    }
    u32::try_from(periods)
        .ok()
        .filter(|p| *p <= max_periods)
        .ok_or_else(|| {
            AppError::bad_request(format!("periods must not exceed {max_periods}, got {periods}"))
        })
}
