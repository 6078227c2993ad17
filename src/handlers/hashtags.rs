use axum::{extract::State, Json};

use crate::handlers::AppState;
use crate::models::HashtagList;

/// Hashtags that can be passed to `POST /forecast`, with their `#` prefix.
pub async fn list(State(state): State<AppState>) -> Json<HashtagList> {
    let window = state.dataset.window();
    Json(HashtagList {
        hashtags: state.dataset.hashtags().map(|h| format!("#{h}")).collect(),
        start_date: window.start,
        end_date: window.end,
    })
}
