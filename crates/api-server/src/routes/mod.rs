//! Route handlers

pub mod health;
pub mod report;
pub mod session;
pub mod task;

use axum::{http::StatusCode, Json, Router};
use tt_core::notice::Notice;
use tt_core::{Error, PersistenceError};

use crate::state::AppState;

pub type RouteError = (StatusCode, Json<Notice>);

/// Map a core error to a status code and a user-facing notice
pub fn route_error(err: Error) -> RouteError {
    let status = match &err {
        Error::Validation(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::InvalidState(_) | Error::Persistence(PersistenceError::DuplicateStartTime(_)) => {
            StatusCode::CONFLICT
        }
        Error::Persistence(_) | Error::ReportIo { .. } => {
            tracing::error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(Notice::from(&err)))
}

/// All API routes, without state
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(session::router())
        .merge(task::router())
        .merge(report::router())
}
