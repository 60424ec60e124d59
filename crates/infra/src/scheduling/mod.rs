//! In-process wake-up timer and fired-event dispatch
//!
//! `TokioWakeTimer` implements the core `WakeTimer` port with one sleeping
//! task per armed key. Expiries are sent over an mpsc channel that
//! `FiredEventDispatcher` drains into `AlarmTimerAdapter::on_fired`.
//!
//! Both follow the same runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Cancellation token support
//! - Timeout wrapping on shutdown

pub mod dispatcher;
pub mod error;
pub mod timer;

pub use dispatcher::FiredEventDispatcher;
pub use error::{SchedulerError, SchedulerResult};
pub use timer::TokioWakeTimer;
