//! Two-sink task persistence
//!
//! Every saved task is appended to the flat log file and inserted into the
//! indexed store, in that order. A failure in the second sink does not undo
//! the first: the log may hold a line the database lacks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, error};

use super::log_file::TaskLogFile;
use super::model::TaskRecord;
use super::repository::TaskRepository;
use super::sqlite_store::SqliteTaskStore;
use crate::config::TrackerConfig;
use crate::error::PersistenceError;
use crate::Result;

struct Sinks {
    log: TaskLogFile,
    db: SqliteTaskStore,
}

/// Task store writing to the log file and the SQLite database.
///
/// File and database calls block, so they run on Tokio's blocking pool.
#[derive(Clone)]
pub struct PersistenceStore {
    sinks: Arc<Sinks>,
}

impl PersistenceStore {
    pub fn new(log: TaskLogFile, db: SqliteTaskStore) -> Self {
        Self {
            sinks: Arc::new(Sinks { log, db }),
        }
    }

    /// Store using the log and database paths of `config`
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            TaskLogFile::new(config.log_path()),
            SqliteTaskStore::new(config.database_path()),
        )
    }

    pub fn log(&self) -> &TaskLogFile {
        &self.sinks.log
    }

    pub fn database(&self) -> &SqliteTaskStore {
        &self.sinks.db
    }

    /// Number of tasks in the indexed store
    pub async fn stored_count(&self) -> Result<usize> {
        self.blocking(|sinks| sinks.db.count()).await
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Sinks) -> std::result::Result<T, PersistenceError> + Send + 'static,
    {
        let sinks = Arc::clone(&self.sinks);
        let outcome = tokio::task::spawn_blocking(move || f(&sinks))
            .await
            .map_err(|e| PersistenceError::Worker(e.to_string()))?;
        Ok(outcome?)
    }
}

#[async_trait]
impl TaskRepository for PersistenceStore {
    async fn save(&self, task: TaskRecord) -> Result<()> {
        if task.is_open() {
            return Err(PersistenceError::OpenTask(task.name).into());
        }

        let name = task.name.clone();
        let result = self
            .blocking(move |sinks| {
                sinks.log.append(&task)?;
                sinks.db.insert(&task)
            })
            .await;

        match &result {
            Ok(()) => debug!("Saved task '{}'", name),
            Err(e) => error!("Failed to save task '{}': {}", name, e),
        }
        result
    }

    async fn query_range(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<Vec<TaskRecord>> {
        self.blocking(move |sinks| sinks.db.select_range(from.as_ref(), to.as_ref()))
            .await
    }
}
