//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Recurrence
pub const DAYS_PER_WEEK: u8 = 7;
pub const MAX_HOUR: u8 = 23;
pub const MAX_MINUTE: u8 = 59;

// Snooze
pub const DEFAULT_SNOOZE_MINUTES: u32 = 5;
pub const MAX_SNOOZE_MINUTES: u32 = 60;

// Storage
pub const DEFAULT_DB_PATH: &str = "alarmclock.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const DAYS_SEPARATOR: char = ',';

// Fired-event channel capacity
pub const DEFAULT_EVENT_BUFFER: usize = 64;

pub const DEFAULT_LOG_LEVEL: &str = "info";
