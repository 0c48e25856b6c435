//! Error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// A requested report range that cannot be served.
///
/// Both variants are recoverable: the caller is expected to show the
/// [`title`](Self::title) and [`message`](Self::message) to the user and let
/// them correct the range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("\"from\" date and time must be strictly before the \"to\" date and time")]
    RangeInverted,

    #[error("\"from\" date and time cannot be in the future")]
    FromInFuture,
}

impl ValidationError {
    /// Short title for a user-facing notice
    pub fn title(&self) -> &'static str {
        match self {
            Self::RangeInverted => "Invalid range",
            Self::FromInFuture => "Date in the future",
        }
    }

    /// Longer explanation for a user-facing notice
    pub fn message(&self) -> &'static str {
        match self {
            Self::RangeInverted => {
                "The \"from\" date and time is after or equal to the \"to\" date and time."
            }
            Self::FromInFuture => "The \"from\" date and time is placed in the future.",
        }
    }
}

/// Failures of either persistence sink.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("There was a problem while saving the task on the file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare storage directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("There was a problem while using the task database: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("A task starting at {0} is already stored")]
    DuplicateStartTime(String),

    #[error("Task '{0}' is still open and cannot be stored")]
    OpenTask(String),

    #[error("Corrupt task row: {0}")]
    CorruptRow(String),

    #[error("Task database lock poisoned")]
    LockPoisoned,

    #[error("Persistence worker failed: {0}")]
    Worker(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("There was a problem while creating the report {path}: {source}")]
    ReportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Create a ReportIo error
    pub fn report_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportIo {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}
