//! Core library for the time tracker
//!
//! This crate contains the core business logic, including:
//! - The tick-driven elapsed counter
//! - Task records and their two persistence sinks
//! - Range validation and report generation
//! - Start/stop session orchestration

pub mod clock;
pub mod config;
pub mod error;
pub mod notice;
pub mod report;
pub mod session;
pub mod task;
pub mod time_format;
pub mod timer;

pub use error::{Error, PersistenceError, ValidationError};
pub type Result<T> = std::result::Result<T, Error>;
