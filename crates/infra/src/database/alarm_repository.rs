//! Alarm definition repository backed by SQLite
//!
//! Repeat days are stored as a comma-separated list of ISO weekday numbers
//! (`"1,3,5"`); an empty string is a one-shot alarm.

use std::collections::BTreeSet;
use std::sync::Arc;

use alarmclock_core::AlarmRepository as AlarmRepositoryPort;
use alarmclock_domain::constants::DAYS_SEPARATOR;
use alarmclock_domain::{AlarmDefinition, AlarmError, AlarmId, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::debug;

use super::manager::{map_sql_error, DbManager};
use crate::errors::InfraError;

/// SQLite-backed implementation of `AlarmRepository`
pub struct SqliteAlarmRepository {
    db: Arc<DbManager>,
}

impl SqliteAlarmRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlarmRepositoryPort for SqliteAlarmRepository {
    async fn load_all(&self) -> DomainResult<Vec<AlarmDefinition>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<AlarmDefinition>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, hour, minute, enabled, label, days
                     FROM alarms ORDER BY hour, minute, id",
                )
                .map_err(map_sql_error)?;

            let rows = stmt
                .query_map([], map_alarm_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            rows.into_iter().map(AlarmRow::into_definition).collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: AlarmId) -> DomainResult<Option<AlarmDefinition>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<AlarmDefinition>> {
            let conn = db.get_connection()?;
            let row = conn
                .query_row(
                    "SELECT id, hour, minute, enabled, label, days FROM alarms WHERE id = ?1",
                    params![id.to_string()],
                    map_alarm_row,
                )
                .optional()
                .map_err(map_sql_error)?;

            row.map(AlarmRow::into_definition).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save(&self, definition: &AlarmDefinition) -> DomainResult<()> {
        definition.validate()?;
        let db = Arc::clone(&self.db);
        let definition = definition.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO alarms (id, hour, minute, enabled, label, days, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, CAST(strftime('%s','now') AS INTEGER))
                 ON CONFLICT(id) DO UPDATE SET
                    hour = excluded.hour,
                    minute = excluded.minute,
                    enabled = excluded.enabled,
                    label = excluded.label,
                    days = excluded.days,
                    updated_at = excluded.updated_at",
                params![
                    definition.id.to_string(),
                    i64::from(definition.hour),
                    i64::from(definition.minute),
                    bool_to_int(definition.enabled),
                    definition.label,
                    encode_days(&definition.days),
                ],
            )
            .map_err(map_sql_error)?;

            debug!(alarm_id = %definition.id, "alarm saved");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: AlarmId) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let removed = conn
                .execute("DELETE FROM alarms WHERE id = ?1", params![id.to_string()])
                .map_err(map_sql_error)?;

            debug!(alarm_id = %id, removed, "alarm deleted");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw column values; converted to a definition outside of rusqlite so that
/// corrupt rows surface as domain errors.
struct AlarmRow {
    id: String,
    hour: i64,
    minute: i64,
    enabled: i64,
    label: String,
    days: String,
}

impl AlarmRow {
    fn into_definition(self) -> DomainResult<AlarmDefinition> {
        let id: AlarmId = self
            .id
            .parse()
            .map_err(|_| AlarmError::Database(format!("corrupt alarm id {:?}", self.id)))?;
        let hour = u8::try_from(self.hour)
            .map_err(|_| AlarmError::Database(format!("corrupt hour {} for {id}", self.hour)))?;
        let minute = u8::try_from(self.minute).map_err(|_| {
            AlarmError::Database(format!("corrupt minute {} for {id}", self.minute))
        })?;

        let definition = AlarmDefinition {
            id,
            hour,
            minute,
            enabled: self.enabled != 0,
            label: self.label,
            days: decode_days(&self.days)
                .map_err(|e| AlarmError::Database(format!("corrupt days for {id}: {e}")))?,
        };
        definition.validate().map_err(|e| AlarmError::Database(e.to_string()))?;
        Ok(definition)
    }
}

fn map_alarm_row(row: &Row) -> rusqlite::Result<AlarmRow> {
    Ok(AlarmRow {
        id: row.get(0)?,
        hour: row.get(1)?,
        minute: row.get(2)?,
        enabled: row.get(3)?,
        label: row.get(4)?,
        days: row.get(5)?,
    })
}

fn map_join_error(err: task::JoinError) -> AlarmError {
    InfraError::from(err).into()
}

// =============================================================================
// Utility Functions
// =============================================================================

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn encode_days(days: &BTreeSet<u8>) -> String {
    days.iter().map(u8::to_string).collect::<Vec<_>>().join(&DAYS_SEPARATOR.to_string())
}

fn decode_days(raw: &str) -> std::result::Result<BTreeSet<u8>, String> {
    raw.split(DAYS_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>().map_err(|e| format!("{part:?}: {e}")))
        .collect()
}
