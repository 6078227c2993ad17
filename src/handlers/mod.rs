pub mod forecasts;
pub mod hashtags;
pub mod health;

use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::LimitsConfig;
use crate::dataset::AlignedTable;
use crate::ml::Forecaster;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<AlignedTable>,
    pub forecaster: Arc<dyn Forecaster>,
    /// Bounds how many model fits run on the blocking pool at once.
    pub fit_permits: Arc<Semaphore>,
    pub limits: LimitsConfig,
}

impl AppState {
    pub fn new(dataset: AlignedTable, forecaster: Arc<dyn Forecaster>, limits: LimitsConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            forecaster,
            fit_permits: Arc::new(Semaphore::new(limits.max_concurrent_fits)),
            limits,
        }
    }
}
