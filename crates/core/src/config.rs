//! Tracker configuration

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = ".tt-data";
pub const DEFAULT_LOG_FILE: &str = "report.dat";
pub const DEFAULT_REPORT_FILE: &str = "export.dat";
pub const DEFAULT_DATABASE_FILE: &str = "timeTracker.db";
pub const DEFAULT_SAVE_QUEUE: usize = 64;

/// Where the tracker keeps its files and how deep the save queue is
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Directory holding the log, report and database files
    pub data_dir: PathBuf,
    /// Append-only log of completed tasks
    pub log_file: String,
    /// Report artifact, rewritten on every run
    pub report_file: String,
    /// SQLite database file
    pub database_file: String,
    /// Capacity of the background save queue
    pub save_queue_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl TrackerConfig {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            report_file: DEFAULT_REPORT_FILE.to_string(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            save_queue_capacity: DEFAULT_SAVE_QUEUE,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join(&self.report_file)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}
