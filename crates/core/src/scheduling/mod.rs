//! Alarm scheduling: ports and the timer adapter

pub mod adapter;
pub mod ports;

pub use adapter::{AlarmTimerAdapter, RestoreReport};
