//! Read-only views over stored tasks

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tt_core::task::{TaskRecord, TaskRepository};

use super::{route_error, RouteError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

/// Tasks started since local midnight
async fn daily_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskRecord>>, RouteError> {
    let tasks = state.controller().daily().await.map_err(route_error)?;
    Ok(Json(tasks))
}

/// Tasks inside an optional range, without the report-side validation
async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<TaskRecord>>, RouteError> {
    let tasks = state
        .store()
        .query_range(params.from, params.to)
        .await
        .map_err(route_error)?;
    Ok(Json(tasks))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks))
        .route("/api/tasks/daily", get(daily_tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tt_core::clock::ManualClock;
    use tt_core::config::TrackerConfig;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn closed(name: &str, start: NaiveDateTime, end: NaiveDateTime) -> TaskRecord {
        let mut task = TaskRecord::new(name, start);
        task.close(end, "00:30:00");
        task
    }

    async fn build_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(at(10, 12, 0)));
        let state = AppState::with_clock(TrackerConfig::new(temp_dir.path()), clock);

        let store = state.store();
        store.save(closed("yesterday", at(9, 10, 0), at(9, 10, 30))).await.unwrap();
        store.save(closed("morning", at(10, 8, 0), at(10, 8, 30))).await.unwrap();
        store.save(closed("late", at(10, 9, 0), at(10, 9, 30))).await.unwrap();
        (state, temp_dir)
    }

    async fn get_json(state: &AppState, uri: &str) -> (StatusCode, Value) {
        let response = router()
            .with_state(state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn daily_lists_only_today() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = get_json(&state, "/api/tasks/daily").await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["morning", "late"]);
    }

    #[tokio::test]
    async fn list_without_bounds_returns_everything_in_order() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = get_json(&state, "/api/tasks").await;

        assert_eq!(status, StatusCode::OK);
        let tasks = payload.as_array().unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0]["name"], "yesterday");
        assert_eq!(tasks[0]["elapsed"], "00:30:00");
    }

    #[tokio::test]
    async fn list_applies_both_bounds() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) =
            get_json(&state, "/api/tasks?from=2026-03-10T00:00:00&to=2026-03-10T08:45:00").await;

        assert_eq!(status, StatusCode::OK);
        let tasks = payload.as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["name"], "morning");
    }
}
