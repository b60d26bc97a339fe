//! Runtime configuration for the console core.
//!
//! # Responsibility
//! - Describe repository timing behavior and process-level settings.
//! - Provide defaults that keep tests fast and deterministic.

use crate::logging::default_log_level;
use std::path::PathBuf;
use std::time::Duration;

/// Artificial per-operation delays applied while `loading` is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyProfile {
    pub initialize: Duration,
    pub add_lead: Duration,
    pub update_lead: Duration,
    pub delete_leads: Duration,
    pub convert_lead: Duration,
    pub bulk_add_leads: Duration,
}

impl LatencyProfile {
    /// No delays.
    pub fn none() -> Self {
        Self::default()
    }

    /// Delays matching the interactive demo console.
    pub fn demo() -> Self {
        Self {
            initialize: Duration::from_millis(2000),
            add_lead: Duration::from_millis(1000),
            update_lead: Duration::from_millis(1000),
            delete_leads: Duration::from_millis(500),
            convert_lead: Duration::from_millis(1000),
            bulk_add_leads: Duration::from_millis(1500),
        }
    }
}

/// Repository construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryConfig {
    pub latency: LatencyProfile,
}

/// Process-level settings used by executables embedding the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// SQLite file holding the key-value entries.
    pub db_path: PathBuf,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub repository: RepositoryConfig,
}

impl ConsoleConfig {
    /// Builds a config with default logging and no artificial latency.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_dir: None,
            log_level: default_log_level().to_string(),
            repository: RepositoryConfig::default(),
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.repository.latency = latency;
        self
    }
}
