//! Task module
//!
//! The task record, its two persistence sinks and the background worker
//! that feeds them.

mod log_file;
mod model;
mod repository;
mod sqlite_store;
mod store;
mod worker;

pub use log_file::TaskLogFile;
pub use model::*;
pub use repository::TaskRepository;
pub use sqlite_store::SqliteTaskStore;
pub use store::PersistenceStore;
pub use worker::{PersistenceWorker, SaveTicket};
