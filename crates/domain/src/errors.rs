//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for alarm scheduling
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AlarmError {
    /// Hour, minute or repeat day outside its valid range.
    #[error("Invalid alarm definition: {0}")]
    InvalidDefinition(String),

    /// The platform timer refused an arm or cancel request.
    #[error("Scheduling denied: {0}")]
    SchedulingDenied(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AlarmError {
    /// Whether the failure came from the platform timer rather than from the
    /// alarm itself. Callers may retry these once permission is granted.
    pub fn is_scheduling_denied(&self) -> bool {
        matches!(self, Self::SchedulingDenied(_))
    }
}

/// Result type alias for alarm operations
pub type Result<T> = std::result::Result<T, AlarmError>;
