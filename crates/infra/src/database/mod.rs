//! Database implementations

pub mod alarm_repository;
pub mod manager;

pub use alarm_repository::SqliteAlarmRepository;
pub use manager::{DbManager, SqliteConnection};
