//! Start/stop endpoints for the running task

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tt_core::notice::Notice;
use tt_core::session::SessionSnapshot;
use tt_core::task::TaskRecord;

use super::{route_error, RouteError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StopParams {
    /// Wait for both sinks before answering
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResponse {
    pub task: TaskRecord,
    /// `true` once both sinks accepted the record, `false` while still queued
    pub saved: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), RouteError> {
    let snapshot = state
        .controller()
        .on_start(&req.description)
        .await
        .map_err(route_error)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn current_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, RouteError> {
    match state.controller().current().await {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(Notice::error("No running task", "Start a task first.")),
        )),
    }
}

async fn stop_session(
    State(state): State<AppState>,
    Query(params): Query<StopParams>,
) -> Result<Json<StopResponse>, RouteError> {
    let stopped = state.controller().on_stop().await.map_err(route_error)?;

    let saved = if params.wait {
        stopped.ticket.wait().await.map_err(route_error)?;
        true
    } else {
        false
    };

    Ok(Json(StopResponse {
        task: stopped.task,
        saved,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(current_session))
        .route("/api/session/start", post(start_session))
        .route("/api/session/stop", post(stop_session))
}
