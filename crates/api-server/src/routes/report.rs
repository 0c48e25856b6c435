//! Report generation endpoint

use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tt_core::notice::Notice;
use tt_core::report::ReportSummary;
use tt_core::Error;

use super::{route_error, RouteError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A bound is used only when its toggle is on; a missing toggle follows the
/// presence of the value. Disabled bounds are ignored, including by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub from_enabled: Option<bool>,
    pub to_enabled: Option<bool>,
}

impl ReportRequest {
    fn bound(
        label: &str,
        value: Option<NaiveDateTime>,
        enabled: Option<bool>,
    ) -> Result<Option<NaiveDateTime>, Error> {
        match (enabled.unwrap_or(value.is_some()), value) {
            (false, _) => Ok(None),
            (true, Some(value)) => Ok(Some(value)),
            (true, None) => Err(Error::InvalidInput(format!(
                "the \"{}\" bound is enabled but has no date and time",
                label
            ))),
        }
    }

    pub fn resolve(&self) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), Error> {
        Ok((
            Self::bound("from", self.from, self.from_enabled)?,
            Self::bound("to", self.to, self.to_enabled)?,
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(flatten)]
    pub notice: Notice,
    #[serde(flatten)]
    pub summary: ReportSummary,
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, RouteError> {
    let (from, to) = req.resolve().map_err(route_error)?;
    let summary = state
        .reports()
        .generate(from, to)
        .await
        .map_err(route_error)?;

    Ok(Json(ReportResponse {
        notice: Notice::from(&summary),
        summary,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/reports", post(create_report))
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
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tt_core::clock::ManualClock;
    use tt_core::config::TrackerConfig;
    use tt_core::task::{TaskRecord, TaskRepository};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    async fn build_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(at(18, 0)));
        let state = AppState::with_clock(TrackerConfig::new(temp_dir.path()), clock);

        for (name, start) in [("planning", at(9, 0)), ("coding", at(10, 0))] {
            let mut task = TaskRecord::new(name, start);
            task.close(start + chrono::TimeDelta::minutes(45), "00:45:00");
            state.store().save(task).await.unwrap();
        }
        (state, temp_dir)
    }

    async fn post_report(state: &AppState, body: Value) -> (StatusCode, Value) {
        let response = router()
            .with_state(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/reports")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn toggles_follow_values_by_default() {
        let req = ReportRequest {
            from: Some(at(9, 0)),
            ..Default::default()
        };
        assert_eq!(req.resolve().unwrap(), (Some(at(9, 0)), None));

        let disabled = ReportRequest {
            from: Some(at(9, 0)),
            from_enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(disabled.resolve().unwrap(), (None, None));

        let missing = ReportRequest {
            to_enabled: Some(true),
            ..Default::default()
        };
        assert!(matches!(missing.resolve(), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unbounded_report_includes_every_task() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(&state, json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["level"], "info");
        assert_eq!(payload["title"], "Report created");
        assert_eq!(payload["taskCount"], 2);

        let content = std::fs::read_to_string(state.config().report_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Task: planning\t"));
        assert!(lines[1].starts_with("Task: coding\t"));
    }

    #[tokio::test]
    async fn bounded_report_filters_tasks() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(
            &state,
            json!({ "from": "2026-03-10T09:30:00", "to": "2026-03-10T11:00:00" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["taskCount"], 1);
        let content = std::fs::read_to_string(state.config().report_path()).unwrap();
        assert!(content.starts_with("Task: coding\t"));
    }

    #[tokio::test]
    async fn inverted_range_is_rejected_without_writing() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(
            &state,
            json!({ "from": "2026-03-10T11:00:00", "to": "2026-03-10T09:00:00" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["title"], "Invalid range");
        assert!(!state.config().report_path().exists());
    }

    #[tokio::test]
    async fn disabled_bounds_are_not_validated() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(
            &state,
            json!({
                "from": "2026-03-10T11:00:00",
                "to": "2026-03-10T09:00:00",
                "fromEnabled": false,
                "toEnabled": false
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["taskCount"], 2);
    }

    #[tokio::test]
    async fn disabled_future_from_with_enabled_to() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(
            &state,
            json!({
                "from": "2026-03-11T09:00:00",
                "fromEnabled": false,
                "to": "2026-03-10T17:00:00",
                "toEnabled": true
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["taskCount"], 2);
    }

    #[tokio::test]
    async fn disabled_from_widens_the_report() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(
            &state,
            json!({ "from": "2026-03-10T09:30:00", "fromEnabled": false }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["taskCount"], 2);
    }

    #[tokio::test]
    async fn future_from_is_rejected() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) =
            post_report(&state, json!({ "from": "2026-03-11T09:00:00" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["title"], "Date in the future");
    }

    #[tokio::test]
    async fn enabled_bound_without_value_is_rejected() {
        let (state, _temp_dir) = build_state().await;

        let (status, payload) = post_report(&state, json!({ "fromEnabled": true })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["title"], "Invalid input");
    }
}
