//! Report generation
//!
//! A report is a plain-text artifact with one line per stored task inside a
//! requested range. Each run replaces the previous artifact; the log file
//! written on every save is a separate, append-only sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::task::{TaskRecord, TaskRepository};
use crate::{Error, Result};

/// Check a requested range against `now`.
///
/// With both ends present the range must be non-empty (`from < to`) and
/// `from` must lie in the past; an inverted range is reported before a
/// future `from`. A lone `from` must lie in the past. A lone `to`, or no
/// bounds at all, is always valid.
pub fn validate_range(
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> std::result::Result<(), ValidationError> {
    match (from, to) {
        (Some(from), Some(to)) => {
            if from >= to {
                return Err(ValidationError::RangeInverted);
            }
            if from >= now {
                return Err(ValidationError::FromInFuture);
            }
            Ok(())
        }
        (Some(from), None) if from >= now => Err(ValidationError::FromInFuture),
        _ => Ok(()),
    }
}

/// Outcome of a successful report run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub path: PathBuf,
    pub task_count: usize,
}

/// Render tasks as report lines, one per task, each newline terminated
pub fn render(tasks: &[TaskRecord]) -> String {
    tasks.iter().map(|task| format!("{}\n", task)).collect()
}

pub struct ReportGenerator {
    repository: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
    output_path: PathBuf,
}

impl ReportGenerator {
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        clock: Arc<dyn Clock>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            clock,
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Check a range against the generator's clock without writing anything
    pub fn validate(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> std::result::Result<(), ValidationError> {
        validate_range(from, to, self.clock.now())
    }

    /// Validate the range, query the store and write a fresh artifact
    pub async fn generate(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<ReportSummary> {
        self.validate(from, to)?;

        let tasks = self.repository.query_range(from, to).await?;
        self.write_artifact(render(&tasks).as_bytes()).await?;

        info!(
            "Report with {} task(s) written to {}",
            tasks.len(),
            self.output_path.display()
        );
        Ok(ReportSummary {
            path: self.output_path.clone(),
            task_count: tasks.len(),
        })
    }

    /// Write to a hidden sibling, then rename over the artifact so readers
    /// never see a partial report
    async fn write_artifact(&self, content: &[u8]) -> Result<()> {
        let target = &self.output_path;
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::report_io(parent, e))?;

        let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4().as_hyphenated()));
        if let Err(e) = write_file(&temp_path, content).await {
            discard(&temp_path).await;
            return Err(Error::report_io(target, e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, target).await {
            discard(&temp_path).await;
            return Err(Error::report_io(target, e));
        }
        Ok(())
    }
}

async fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove temporary report {}: {}", path.display(), e);
    }
}
