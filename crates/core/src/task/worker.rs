//! Background persistence worker
//!
//! Saves are queued on a bounded channel and applied one at a time by a
//! single consumer task, so the interactive path never waits on disk or
//! database I/O. Each dispatch returns a [`SaveTicket`] that resolves when
//! the save finishes; dropping it makes the save fire-and-forget.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::model::TaskRecord;
use super::repository::TaskRepository;
use crate::error::PersistenceError;
use crate::Result;

struct SaveJob {
    task: TaskRecord,
    done: oneshot::Sender<Result<()>>,
}

/// Completion handle for one queued save
#[derive(Debug)]
pub struct SaveTicket {
    rx: oneshot::Receiver<Result<()>>,
}

impl SaveTicket {
    /// A ticket for a save that already finished
    pub(crate) fn ready(result: Result<()>) -> Self {
        let (done, rx) = oneshot::channel();
        let _ = done.send(result);
        Self { rx }
    }

    /// Wait for the save to finish and return its outcome
    pub async fn wait(self) -> Result<()> {
        self.rx.await.map_err(|_| {
            PersistenceError::Worker("save was dropped before completing".to_string())
        })?
    }
}

/// Handle to the single save consumer. Clones share the same queue.
#[derive(Clone)]
pub struct PersistenceWorker {
    tx: mpsc::Sender<SaveJob>,
    cancel: CancellationToken,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl PersistenceWorker {
    /// Spawn the consumer on the current Tokio runtime
    pub fn spawn(repository: Arc<dyn TaskRepository>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_worker(repository, rx, cancel.clone()));

        Self {
            tx,
            cancel,
            handle: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Queue a closed task for saving.
    ///
    /// Waits only while the queue is full.
    pub async fn dispatch(&self, task: TaskRecord) -> Result<SaveTicket> {
        if task.is_open() {
            return Err(PersistenceError::OpenTask(task.name).into());
        }

        let (done, rx) = oneshot::channel();
        self.tx
            .send(SaveJob { task, done })
            .await
            .map_err(|_| PersistenceError::Worker("save queue is closed".to_string()))?;
        Ok(SaveTicket { rx })
    }

    /// Saves queued but not yet picked up
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Stop accepting saves, finish the queued ones and wait for the consumer
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Persistence worker ended abnormally: {}", e);
            }
        }
    }
}

async fn run_worker(
    repository: Arc<dyn TaskRepository>,
    mut rx: mpsc::Receiver<SaveJob>,
    cancel: CancellationToken,
) {
    debug!("Persistence worker started");
    loop {
        tokio::select! {
            job = rx.recv() => match job {
                Some(job) => process(repository.as_ref(), job).await,
                None => break,
            },
            () = cancel.cancelled() => {
                rx.close();
                while let Some(job) = rx.recv().await {
                    process(repository.as_ref(), job).await;
                }
                break;
            }
        }
    }
    info!("Persistence worker stopped");
}

async fn process(repository: &dyn TaskRepository, job: SaveJob) {
    let name = job.task.name.clone();
    let result = repository.save(job.task).await;
    if let Err(Err(e)) = job.done.send(result) {
        warn!("Background save of task '{}' failed with nobody waiting: {}", name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{PersistenceStore, SqliteTaskStore, TaskLogFile};
    use crate::Error;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn closed(name: &str, minute: u32) -> TaskRecord {
        let day = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        TaskRecord::from_stored(
            name,
            day.and_hms_opt(9, minute, 0).unwrap(),
            day.and_hms_opt(10, minute, 0).unwrap(),
            "01:00:00",
        )
    }

    fn test_store(temp: &TempDir) -> PersistenceStore {
        PersistenceStore::new(
            TaskLogFile::new(temp.path().join("report.dat")),
            SqliteTaskStore::in_memory(),
        )
    }

    #[tokio::test]
    async fn test_ticket_reports_success() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let worker = PersistenceWorker::spawn(Arc::new(store.clone()), 4);

        let task = closed("Queued", 0);
        worker.dispatch(task.clone()).await.unwrap().wait().await.unwrap();

        assert_eq!(store.query_range(None, None).await.unwrap(), vec![task]);
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_ticket_reports_failure() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let worker = PersistenceWorker::spawn(Arc::new(store), 4);

        let task = closed("Twice", 0);
        worker.dispatch(task.clone()).await.unwrap().wait().await.unwrap();
        let err = worker.dispatch(task).await.unwrap().wait().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Persistence(PersistenceError::DuplicateStartTime(_))
        ));
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_drains_dropped_tickets() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let worker = PersistenceWorker::spawn(Arc::new(store.clone()), 16);

        for minute in 0..10 {
            // fire-and-forget
            drop(worker.dispatch(closed("Background", minute)).await.unwrap());
        }
        worker.shutdown().await;

        assert_eq!(store.query_range(None, None).await.unwrap().len(), 10);
        assert!(worker.dispatch(closed("Late", 30)).await.is_err());
    }

    #[tokio::test]
    async fn test_open_task_is_not_queued() {
        let temp = TempDir::new().unwrap();
        let worker = PersistenceWorker::spawn(Arc::new(test_store(&temp)), 4);
        let open = TaskRecord::new("Open", closed("x", 0).start_time);
        assert!(worker.dispatch(open).await.is_err());
        worker.shutdown().await;
    }

    struct OrderRecorder {
        seen: tokio::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TaskRepository for OrderRecorder {
        async fn save(&self, task: TaskRecord) -> Result<()> {
            tokio::task::yield_now().await;
            self.seen.lock().await.push(task.name);
            Ok(())
        }

        async fn query_range(
            &self,
            _from: Option<NaiveDateTime>,
            _to: Option<NaiveDateTime>,
        ) -> Result<Vec<TaskRecord>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_saves_apply_in_dispatch_order() {
        let recorder = Arc::new(OrderRecorder {
            seen: tokio::sync::Mutex::new(Vec::new()),
        });
        let worker = PersistenceWorker::spawn(recorder.clone(), 2);

        let mut tickets = Vec::new();
        for minute in 0..6 {
            tickets.push(
                worker
                    .dispatch(closed(&format!("T{}", minute), minute))
                    .await
                    .unwrap(),
            );
        }
        for ticket in tickets {
            ticket.wait().await.unwrap();
        }

        let seen = recorder.seen.lock().await.clone();
        assert_eq!(seen, vec!["T0", "T1", "T2", "T3", "T4", "T5"]);
        worker.shutdown().await;
    }
}
