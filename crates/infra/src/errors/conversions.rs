//! Conversions from external infrastructure errors into domain errors.

use alarmclock_domain::AlarmError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AlarmError);

impl From<InfraError> for AlarmError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AlarmError> for InfraError {
    fn from(value: AlarmError) -> Self {
        InfraError(value)
    }
}

trait IntoAlarmError {
    fn into_alarm_error(self) -> AlarmError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AlarmError */
/* -------------------------------------------------------------------------- */

impl IntoAlarmError for SqlError {
    fn into_alarm_error(self) -> AlarmError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => AlarmError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        AlarmError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        AlarmError::Database(format!("check constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        AlarmError::Database("unique constraint violation".into())
                    }
                    _ => AlarmError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => AlarmError::NotFound("no rows returned by query".into()),
            RE::InvalidQuery => AlarmError::Database("invalid SQL query".into()),
            other => AlarmError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_alarm_error())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → AlarmError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(AlarmError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → AlarmError */
/* -------------------------------------------------------------------------- */

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        let message = if value.is_cancelled() {
            "blocking task cancelled".to_string()
        } else {
            format!("blocking task panicked: {value}")
        };
        InfraError(AlarmError::Internal(message))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
