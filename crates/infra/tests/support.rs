#![allow(dead_code)]

use std::sync::Arc;

use alarmclock_core::Clock;
use alarmclock_domain::{AlarmDefinition, Config, DatabaseConfig};
use alarmclock_infra::database::DbManager;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("alarms.db");

        let manager = DbManager::new(&db_path, 2).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration pointing at a database inside `dir`.
pub fn config_in(dir: &TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            path: dir.path().join("alarms.db").to_string_lossy().into_owned(),
            pool_size: 2,
        },
        ..Config::default()
    }
}

/// January 2024, day 1 is a Monday.
pub fn at(day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .expect("valid test instant")
}

pub fn alarm(hour: u8, minute: u8, days: &[u8]) -> AlarmDefinition {
    AlarmDefinition::new(hour, minute).expect("valid alarm").with_days(days.iter().copied())
}

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
