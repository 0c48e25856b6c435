//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::model::TaskRecord;
use crate::Result;

/// Repository interface for completed tasks
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a closed task
    async fn save(&self, task: TaskRecord) -> Result<()>;

    /// Tasks with `start_time >= from` and `end_time <= to`, each bound
    /// applied only when present, oldest start first
    async fn query_range(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<Vec<TaskRecord>>;

    /// Tasks started on or after `start_of_day`
    async fn query_daily(&self, start_of_day: NaiveDateTime) -> Result<Vec<TaskRecord>> {
        self.query_range(Some(start_of_day), None).await
    }
}
