//! Scheduler error types

use alarmclock_domain::AlarmError;
use thiserror::Error;

use crate::errors::InfraError;

/// Errors raised by the fired-event dispatcher lifecycle
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Dispatcher is already running
    #[error("Dispatcher already running")]
    AlreadyRunning,

    /// Dispatcher is not running
    #[error("Dispatcher not running")]
    NotRunning,

    /// The fired-event receiver was lost with a previous run
    #[error("Fired-event receiver unavailable")]
    ReceiverUnavailable,

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<tokio::task::JoinError> for SchedulerError {
    fn from(err: tokio::task::JoinError) -> Self {
        SchedulerError::TaskJoinFailed(err.to_string())
    }
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        InfraError(AlarmError::Internal(err.to_string()))
    }
}

impl From<SchedulerError> for AlarmError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_become_internal() {
        let err: AlarmError = SchedulerError::AlreadyRunning.into();
        assert_eq!(err, AlarmError::Internal("Dispatcher already running".into()));
    }

    #[test]
    fn timeout_reports_seconds() {
        assert_eq!(SchedulerError::Timeout { seconds: 5 }.to_string(), "Operation timed out after 5s");
    }
}
