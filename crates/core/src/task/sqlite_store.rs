//! SQLite-backed indexed task store.
//!
//! The connection is opened on first use, together with the table, and kept
//! for the lifetime of the store. All access goes through one mutex, so
//! opening is idempotent and concurrent saves/queries are serialized.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::{debug, info};

use super::model::TaskRecord;
use crate::error::PersistenceError;
use crate::time_format::{from_storage, parse_elapsed, to_storage};

/// Idempotent DDL applied when the connection is opened.
pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS TIME_TRACKER (
    START_TIME TEXT NOT NULL PRIMARY KEY,   -- ISO-8601, millisecond precision
    END_TIME   TEXT NOT NULL,
    TASK_NAME  TEXT NOT NULL,
    DELTA      TEXT NOT NULL                -- HH:mm:ss
);

CREATE INDEX IF NOT EXISTS IDX_TIME_TRACKER_END ON TIME_TRACKER(END_TIME);
"#;

const SELECT_RANGE_SQL: &str = "SELECT START_TIME, END_TIME, TASK_NAME, DELTA FROM TIME_TRACKER \
     WHERE (?1 IS NULL OR START_TIME >= ?1) AND (?2 IS NULL OR END_TIME <= ?2) \
     ORDER BY START_TIME ASC";

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

pub struct SqliteTaskStore {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl SqliteTaskStore {
    /// Store backed by the database file at `path`; nothing is opened yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: Mutex::new(None),
        }
    }

    /// Private in-memory database, mostly for tests
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, PersistenceError> {
        self.conn.lock().map_err(|_| PersistenceError::LockPoisoned)
    }

    fn open(&self) -> Result<Connection, PersistenceError> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|source| {
                            PersistenceError::Directory {
                                path: parent.to_path_buf(),
                                source,
                            }
                        })?;
                    }
                }
                Connection::open(path)?
            }
            Location::Memory => Connection::open_in_memory()?,
        };
        conn.execute_batch(SCHEMA_SQL)?;
        info!("Opened task database {:?}", self.location);
        Ok(conn)
    }

    /// Run `f` on the shared connection, opening it first if needed
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut guard = self.lock()?;
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.open()?,
        };
        f(guard.insert(conn))
    }

    /// Insert a closed task keyed by its start time
    pub fn insert(&self, task: &TaskRecord) -> Result<(), PersistenceError> {
        let (Some(end_time), Some(elapsed)) = (task.end_time.as_ref(), task.elapsed.as_deref())
        else {
            return Err(PersistenceError::OpenTask(task.name.clone()));
        };

        let start = to_storage(&task.start_time);
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO TIME_TRACKER (START_TIME, END_TIME, TASK_NAME, DELTA) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![start, to_storage(end_time), task.name, elapsed],
            )
            .map_err(|err| match err {
                rusqlite::Error::SqliteFailure(ref e, _)
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    PersistenceError::DuplicateStartTime(start.clone())
                }
                other => PersistenceError::Database(other),
            })?;
            Ok(())
        })?;

        debug!("Inserted task '{}' starting at {}", task.name, start);
        Ok(())
    }

    /// Tasks within the optional bounds, ascending by start time
    pub fn select_range(
        &self,
        from: Option<&NaiveDateTime>,
        to: Option<&NaiveDateTime>,
    ) -> Result<Vec<TaskRecord>, PersistenceError> {
        let from = from.map(to_storage);
        let to = to.map(to_storage);

        self.with_connection(|conn| {
            let mut stmt = conn.prepare(SELECT_RANGE_SQL)?;
            let rows = stmt.query_map(params![from, to], read_row)?;

            let mut tasks = Vec::new();
            for row in rows {
                let (start, end, name, delta) = row?;
                tasks.push(decode_row(start, end, name, delta)?);
            }
            Ok(tasks)
        })
    }

    /// Number of stored tasks
    pub fn count(&self) -> Result<usize, PersistenceError> {
        self.with_connection(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM TIME_TRACKER", [], |row| row.get(0))?;
            usize::try_from(count)
                .map_err(|_| PersistenceError::CorruptRow(format!("negative count {}", count)))
        })
    }
}

type RawRow = (String, String, String, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_row(
    start: String,
    end: String,
    name: String,
    delta: String,
) -> Result<TaskRecord, PersistenceError> {
    let start_time = from_storage(&start)
        .map_err(|e| PersistenceError::CorruptRow(format!("START_TIME '{}': {}", start, e)))?;
    let end_time = from_storage(&end)
        .map_err(|e| PersistenceError::CorruptRow(format!("END_TIME '{}': {}", end, e)))?;
    if parse_elapsed(&delta).is_none() {
        return Err(PersistenceError::CorruptRow(format!("DELTA '{}'", delta)));
    }
    Ok(TaskRecord::from_stored(name, start_time, end_time, delta))
}
