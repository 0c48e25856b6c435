//! Application state

use std::sync::Arc;

use tt_core::clock::{Clock, SystemClock};
use tt_core::config::TrackerConfig;
use tt_core::report::ReportGenerator;
use tt_core::session::SessionController;
use tt_core::task::{PersistenceStore, PersistenceWorker, TaskRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TrackerConfig,
    store: PersistenceStore,
    controller: SessionController,
    reports: ReportGenerator,
}

impl AppState {
    /// Create the state for `config` using the system clock.
    ///
    /// Spawns the persistence worker, so it must run inside a Tokio runtime.
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        let store = PersistenceStore::from_config(&config);
        let repository: Arc<dyn TaskRepository> = Arc::new(store.clone());
        let worker = PersistenceWorker::spawn(Arc::clone(&repository), config.save_queue_capacity);
        let controller =
            SessionController::new(Arc::clone(&repository), worker, Arc::clone(&clock));
        let reports = ReportGenerator::new(repository, clock, config.report_path());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                controller,
                reports,
            }),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &PersistenceStore {
        &self.inner.store
    }

    pub fn controller(&self) -> &SessionController {
        &self.inner.controller
    }

    pub fn reports(&self) -> &ReportGenerator {
        &self.inner.reports
    }

    /// Finish queued saves
    pub async fn shutdown(&self) {
        self.inner.controller.worker().shutdown().await;
    }
}
