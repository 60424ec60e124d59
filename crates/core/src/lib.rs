//! # Alarmclock Core
//!
//! Pure scheduling logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Recurrence resolution (next fire instant for an alarm)
//! - Port interfaces (traits) for storage, the wake-up timer, notification
//!   and the clock
//! - The timer adapter that keeps platform timers in line with alarm state
//! - The alarm service used by the editor surface
//!
//! ## Architecture Principles
//! - Only depends on `alarmclock-domain`
//! - No database, OS timer or platform code
//! - All external dependencies via traits

pub mod alarms;
pub mod recurrence;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use alarms::AlarmService;
pub use recurrence::{next_fire_instant, snooze_instant};
pub use scheduling::ports::{AlarmNotifier, AlarmRepository, Clock, WakeTimer};
pub use scheduling::{AlarmTimerAdapter, RestoreReport};
