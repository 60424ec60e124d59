//! # Alarmclock Infrastructure
//!
//! Infrastructure implementations of core scheduling ports.
//!
//! This crate contains:
//! - SQLite alarm storage
//! - An in-process one-shot wake timer and the fired-event dispatcher
//! - Configuration loading and tracing setup
//! - Runtime wiring of all of the above
//!
//! ## Architecture
//! - Implements traits defined in `alarmclock-core`
//! - Depends on `alarmclock-domain` and `alarmclock-core`
//! - Contains all "impure" code (I/O, clocks, background tasks)

pub mod clock;
pub mod config;
pub mod database;
pub mod errors;
pub mod notification;
pub mod observability;
pub mod runtime;
pub mod scheduling;

// Re-export commonly used items
pub use clock::SystemClock;
pub use database::{DbManager, SqliteAlarmRepository};
pub use notification::BroadcastNotifier;
pub use runtime::AlarmRuntime;
pub use scheduling::{FiredEventDispatcher, TokioWakeTimer};
