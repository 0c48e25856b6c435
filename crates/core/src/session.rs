//! Start/stop orchestration for the single running task

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::task::{PersistenceWorker, SaveTicket, TaskRecord, TaskRepository};
use crate::timer::ElapsedTimer;
use crate::{Error, Result};

/// View of the running task for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub name: String,
    pub start_time: NaiveDateTime,
    pub elapsed: String,
}

/// A task that was just stopped and queued for saving
#[derive(Debug)]
pub struct StoppedTask {
    pub task: TaskRecord,
    pub ticket: SaveTicket,
}

struct ActiveTask {
    record: TaskRecord,
    timer: ElapsedTimer,
}

impl ActiveTask {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            name: self.record.name.clone(),
            start_time: self.record.start_time,
            elapsed: self.timer.current_string(),
        }
    }
}

pub struct SessionController {
    repository: Arc<dyn TaskRepository>,
    worker: PersistenceWorker,
    clock: Arc<dyn Clock>,
    active: Mutex<Option<ActiveTask>>,
}

impl SessionController {
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        worker: PersistenceWorker,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            worker,
            clock,
            active: Mutex::new(None),
        }
    }

    pub fn worker(&self) -> &PersistenceWorker {
        &self.worker
    }

    /// Begin timing a task named by `description`
    pub async fn on_start(&self, description: &str) -> Result<SessionSnapshot> {
        let name = description.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "Task description cannot be empty".to_string(),
            ));
        }

        let mut active = self.active.lock().await;
        if let Some(running) = active.as_ref() {
            return Err(Error::invalid_state(format!(
                "task '{}' is already running",
                running.record.name
            )));
        }

        let record = TaskRecord::new(name, self.clock.now());
        let timer = ElapsedTimer::new();
        timer.start()?;

        info!("Started task '{}' at {}", record.name, record.start_time);
        let task = ActiveTask { record, timer };
        let snapshot = task.snapshot();
        *active = Some(task);
        Ok(snapshot)
    }

    /// Stop the running task and queue it for saving.
    ///
    /// When the queue no longer accepts work the task is saved inline, so
    /// the closed record always comes back with a ticket holding the outcome.
    pub async fn on_stop(&self) -> Result<StoppedTask> {
        let ActiveTask { mut record, timer } = self
            .active
            .lock()
            .await
            .take()
            .ok_or_else(|| Error::invalid_state("no task is running"))?;

        let elapsed = timer.stop()?;
        record.close(self.clock.now(), elapsed);
        info!("Stopped task: {}", record);

        let ticket = match self.worker.dispatch(record.clone()).await {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("Task could not be queued ({}), saving inline: {}", e, record);
                let result = self.repository.save(record.clone()).await;
                if let Err(e) = &result {
                    error!("Inline save failed ({}): {}", e, record);
                }
                SaveTicket::ready(result)
            }
        };

        Ok(StoppedTask {
            task: record,
            ticket,
        })
    }

    /// The running task, if any, with its live elapsed counter
    pub async fn current(&self) -> Option<SessionSnapshot> {
        self.active.lock().await.as_ref().map(ActiveTask::snapshot)
    }

    /// Tasks stored since local midnight
    pub async fn daily(&self) -> Result<Vec<TaskRecord>> {
        self.repository
            .query_daily(self.clock.start_of_today())
            .await
    }
}
