//! Domain types and models

pub mod alarm;
pub mod timer;

pub use alarm::{AlarmDefinition, AlarmId};
pub use timer::{AlarmFired, ArmState, ArmedTimer, FireOutcome, TimerFired, TimerKey, TimerSlot};
