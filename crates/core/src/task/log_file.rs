//! Append-only task log
//!
//! One human-readable line per completed task. The file is never truncated
//! by normal operation.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::debug;

use super::model::TaskRecord;
use crate::error::PersistenceError;

pub struct TaskLogFile {
    path: PathBuf,
}

impl TaskLogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::LogFile {
            path: self.path.clone(),
            source,
        }
    }

    /// Append the task's line, creating the file and its directory if needed
    pub fn append(&self, task: &TaskRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", task).map_err(|e| self.io_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))?;

        debug!("Appended task '{}' to {}", task.name, self.path.display());
        Ok(())
    }

    /// Every non-empty line written so far
    pub fn read_lines(&self) -> Result<Vec<String>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }
}
