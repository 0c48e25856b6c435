//! Server configuration from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use tt_core::config::{TrackerConfig, DEFAULT_DATA_DIR};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub tracker: TrackerConfig,
}

fn env_string(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        _ => None,
    }
}

impl ServerConfig {
    /// Read `TT_DATA_DIR`, `TT_BIND_ADDR`, `TT_LOG_FILE`, `TT_REPORT_FILE`
    /// and `TT_SAVE_QUEUE`, falling back to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = env_string("TT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let mut tracker = TrackerConfig::new(data_dir);

        if let Some(name) = env_string("TT_LOG_FILE") {
            tracker.log_file = name;
        }
        if let Some(name) = env_string("TT_REPORT_FILE") {
            tracker.report_file = name;
        }
        if let Some(raw) = env_string("TT_SAVE_QUEUE") {
            tracker.save_queue_capacity = raw
                .parse()
                .with_context(|| format!("TT_SAVE_QUEUE is not a number: {}", raw))?;
        }

        let raw_addr = env_string("TT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .with_context(|| format!("TT_BIND_ADDR is not a socket address: {}", raw_addr))?;

        Ok(Self { bind_addr, tracker })
    }
}
