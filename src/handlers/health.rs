use axum::{extract::State, Json};

use crate::handlers::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let window = state.dataset.window();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.forecaster.name(),
        "rows": state.dataset.len(),
        "hashtags": state.dataset.hashtags().count(),
        "start_date": window.start,
        "end_date": window.end,
    }))
}
