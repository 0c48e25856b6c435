//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    data_dir: String,
    pending_saves: usize,
    stored_tasks: Option<usize>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, stored_tasks) = match state.store().stored_count().await {
        Ok(count) => ("ok", Some(count)),
        Err(e) => {
            tracing::warn!("Task database unavailable: {}", e);
            ("degraded", None)
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir: state.config().data_dir.to_string_lossy().to_string(),
        pending_saves: state.controller().worker().pending(),
        stored_tasks,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
