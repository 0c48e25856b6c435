//! Task model definitions

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time_format::format_date_time;

/// Whether a task is still being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Open,
    Closed,
}

/// One timed work session.
///
/// Equality compares all four fields, including the elapsed text as given.
/// `elapsed` is never recomputed from the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub elapsed: Option<String>,
}

impl TaskRecord {
    /// Create an open task starting at `start_time`
    pub fn new(name: impl Into<String>, start_time: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time: None,
            elapsed: None,
        }
    }

    /// Rebuild a closed task read back from storage
    pub fn from_stored(
        name: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        elapsed: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time: Some(end_time),
            elapsed: Some(elapsed.into()),
        }
    }

    /// Set the end time and elapsed counter
    pub fn close(&mut self, end_time: NaiveDateTime, elapsed: impl Into<String>) {
        self.end_time = Some(end_time);
        self.elapsed = Some(elapsed.into());
    }

    pub fn phase(&self) -> TaskPhase {
        if self.end_time.is_some() && self.elapsed.is_some() {
            TaskPhase::Closed
        } else {
            TaskPhase::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase() == TaskPhase::Open
    }
}

/// The log/report line:
/// `Task: <name>\tStart: <ts>\tEnd: <ts>\tDelta: <HH:mm:ss>`
impl fmt::Display for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task: {}\tStart: {}\tEnd: {}\tDelta: {}",
            self.name,
            format_date_time(Some(&self.start_time)),
            format_date_time(self.end_time.as_ref()),
            self.elapsed.as_deref().unwrap_or(crate::time_format::UNKNOWN)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_create_task_is_open() {
        let task = TaskRecord::new("Write report", at(9, 0, 0));
        assert_eq!(task.name, "Write report");
        assert!(task.is_open());
        assert!(task.end_time.is_none());
        assert!(task.elapsed.is_none());
    }

    #[test]
    fn test_close_task() {
        let mut task = TaskRecord::new("Write report", at(9, 0, 0));
        task.close(at(9, 30, 0), "00:30:00");
        assert_eq!(task.phase(), TaskPhase::Closed);
        assert_eq!(task.end_time, Some(at(9, 30, 0)));
        assert_eq!(task.elapsed.as_deref(), Some("00:30:00"));
    }

    #[test]
    fn test_equality_uses_elapsed_text() {
        let a = TaskRecord::from_stored("Review", at(10, 0, 0), at(10, 5, 0), "00:05:00");
        let b = TaskRecord::from_stored("Review", at(10, 0, 0), at(10, 5, 0), "00:05:00");
        let drifted = TaskRecord::from_stored("Review", at(10, 0, 0), at(10, 5, 0), "00:04:59");
        assert_eq!(a, b);
        assert_ne!(a, drifted);
    }

    #[test]
    fn test_display_line_format() {
        let task = TaskRecord::from_stored("Standup", at(9, 15, 0), at(9, 30, 5), "00:15:05");
        assert_eq!(
            task.to_string(),
            "Task: Standup\tStart: 2024/02/29 09:15:00\tEnd: 2024/02/29 09:30:05\tDelta: 00:15:05"
        );
    }

    #[test]
    fn test_display_open_task_marks_unknown() {
        let task = TaskRecord::new("Standup", at(9, 15, 0));
        assert!(task.to_string().ends_with("End: unknown\tDelta: unknown"));
    }
}
