//! Wake-up timer keys and events exchanged with the platform timer.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::alarm::AlarmId;

/// Which of an alarm's two independent timer slots a key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSlot {
    Primary,
    Snooze,
}

crate::impl_domain_enum_conversions!(TimerSlot {
    Primary => "primary",
    Snooze => "snooze",
});

/// Key under which a one-shot wake-up is registered with the timer service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerKey {
    pub alarm_id: AlarmId,
    pub slot: TimerSlot,
}

impl TimerKey {
    pub fn primary(alarm_id: AlarmId) -> Self {
        Self { alarm_id, slot: TimerSlot::Primary }
    }

    pub fn snooze(alarm_id: AlarmId) -> Self {
        Self { alarm_id, slot: TimerSlot::Snooze }
    }

    pub fn is_snooze(&self) -> bool {
        self.slot == TimerSlot::Snooze
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alarm_id, self.slot)
    }
}

/// A wake-up currently registered with the timer service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmedTimer {
    pub key: TimerKey,
    pub fire_at: NaiveDateTime,
}

/// Delivered by the timer service when an armed key expires.
///
/// `scheduled_for` is the instant the key was armed for, which lets the
/// receiver discard events from an arm that has since been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFired {
    pub key: TimerKey,
    pub scheduled_for: NaiveDateTime,
}

/// Handed to the presentation layer when an alarm rings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmFired {
    pub alarm_id: AlarmId,
    pub label: String,
    pub fired_at: NaiveDateTime,
    pub slot: TimerSlot,
}

/// Primary-slot state of an alarm after a reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "at", rename_all = "snake_case")]
pub enum ArmState {
    Disarmed,
    Armed(NaiveDateTime),
}

impl ArmState {
    pub fn armed_at(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Armed(at) => Some(*at),
            Self::Disarmed => None,
        }
    }
}

/// What handling a fired event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// Repeating alarm armed again for its next matching weekday.
    Rearmed(NaiveDateTime),
    /// One-shot alarm rang and is now disabled.
    Disabled,
    /// Snooze slot rang; the primary schedule is untouched.
    SnoozeFinished,
    /// Unknown, cancelled or superseded key.
    Ignored,
}
