//! Title + message pairs shown to the user

use serde::Serialize;

use crate::error::{Error, PersistenceError};
use crate::report::ReportSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&ReportSummary> for Notice {
    fn from(summary: &ReportSummary) -> Self {
        Notice::info(
            "Report created",
            format!(
                "Report successfully created with {} task(s) at {}",
                summary.task_count,
                summary.path.display()
            ),
        )
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation(v) => Notice::error(v.title(), v.message()),
            Error::ReportIo { .. } => Notice::error("Report not created", err.to_string()),
            Error::Persistence(PersistenceError::DuplicateStartTime(_)) => {
                Notice::error("Task already stored", err.to_string())
            }
            Error::Persistence(_) => Notice::error("Storage problem", err.to_string()),
            Error::InvalidInput(_) => Notice::error("Invalid input", err.to_string()),
            Error::InvalidState(_) => Notice::error("Not allowed now", err.to_string()),
        }
    }
}
