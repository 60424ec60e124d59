//! Configuration structures
//!
//! Every section has serde defaults so partial files load cleanly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_EVENT_BUFFER, DEFAULT_LOG_LEVEL,
    DEFAULT_SNOOZE_MINUTES, MAX_SNOOZE_MINUTES,
};
use crate::{AlarmError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(AlarmError::Config("database path must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(AlarmError::Config("database pool size must be at least 1".into()));
        }
        if self.scheduling.snooze_minutes == 0
            || self.scheduling.snooze_minutes > MAX_SNOOZE_MINUTES
        {
            return Err(AlarmError::Config(format!(
                "snooze must be between 1 and {MAX_SNOOZE_MINUTES} minutes, got {}",
                self.scheduling.snooze_minutes
            )));
        }
        if self.scheduling.event_buffer == 0 {
            return Err(AlarmError::Config("event buffer must be at least 1".into()));
        }
        Ok(())
    }
}

/// SQLite storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path(), pool_size: default_pool_size() }
    }
}

/// Timer and snooze behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: u32,
    /// Capacity of the fired-event channel between timer and dispatcher.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl SchedulingConfig {
    pub fn snooze_offset(&self) -> Duration {
        Duration::from_secs(u64::from(self.snooze_minutes) * 60)
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self { snooze_minutes: default_snooze_minutes(), event_buffer: default_event_buffer() }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_snooze_minutes() -> u32 {
    DEFAULT_SNOOZE_MINUTES
}

fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
