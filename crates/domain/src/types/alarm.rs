//! Alarm definitions as stored and edited by the user.
//!
//! Repeat days are ISO weekday numbers: 1 = Monday through 7 = Sunday. An
//! empty set means the alarm fires once and then disables itself.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DAYS_PER_WEEK, MAX_HOUR, MAX_MINUTE};
use crate::{AlarmError, Result};

/// Stable identifier of an alarm definition (UUIDv7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(Uuid);

impl AlarmId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AlarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AlarmId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AlarmId {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| AlarmError::InvalidDefinition(format!("invalid alarm id {s:?}: {e}")))
    }
}

/// A user-configured alarm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmDefinition {
    pub id: AlarmId,
    pub hour: u8,
    pub minute: u8,
    pub enabled: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub days: BTreeSet<u8>,
}

impl AlarmDefinition {
    /// Create an enabled one-shot alarm with a fresh id.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        let definition = Self {
            id: AlarmId::new(),
            hour,
            minute,
            enabled: true,
            label: String::new(),
            days: BTreeSet::new(),
        };
        definition.validate()?;
        Ok(definition)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replace the repeat days. Values are checked by [`Self::validate`].
    pub fn with_days<I: IntoIterator<Item = u8>>(mut self, days: I) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check hour, minute and repeat days. Out-of-range values are rejected,
    /// never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.hour > MAX_HOUR {
            return Err(AlarmError::InvalidDefinition(format!(
                "hour {} out of range 0-{MAX_HOUR}",
                self.hour
            )));
        }
        if self.minute > MAX_MINUTE {
            return Err(AlarmError::InvalidDefinition(format!(
                "minute {} out of range 0-{MAX_MINUTE}",
                self.minute
            )));
        }
        if let Some(day) = self.days.iter().find(|d| !(1..=DAYS_PER_WEEK).contains(*d)) {
            return Err(AlarmError::InvalidDefinition(format!(
                "repeat day {day} out of range 1-{DAYS_PER_WEEK}"
            )));
        }
        Ok(())
    }

    /// Time of day the alarm rings, seconds fixed at zero.
    pub fn time_of_day(&self) -> Result<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0).ok_or_else(|| {
            AlarmError::InvalidDefinition(format!("{:02}:{:02} is not a time", self.hour, self.minute))
        })
    }

    pub fn is_repeating(&self) -> bool {
        !self.days.is_empty()
    }

    pub fn repeats_on(&self, weekday: Weekday) -> bool {
        u8::try_from(weekday.number_from_monday()).is_ok_and(|n| self.days.contains(&n))
    }

    /// Whether a change from `previous` requires the primary timer to move.
    pub fn schedule_differs(&self, previous: &Self) -> bool {
        self.hour != previous.hour
            || self.minute != previous.minute
            || self.days != previous.days
            || self.enabled != previous.enabled
    }

    /// Human-readable summary of the repeat days.
    pub fn days_label(&self) -> String {
        const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

        let weekdays: BTreeSet<u8> = (1..=5).collect();
        let weekends: BTreeSet<u8> = (6..=7).collect();

        match self.days.len() {
            0 => "Once".to_string(),
            7 => "Every day".to_string(),
            _ if self.days == weekdays => "Weekdays".to_string(),
            _ if self.days == weekends => "Weekends".to_string(),
            _ => self
                .days
                .iter()
                .filter_map(|d| NAMES.get(usize::from(*d).wrapping_sub(1)))
                .copied()
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for AlarmDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} ({})", self.hour, self.minute, self.days_label())?;
        if !self.label.is_empty() {
            write!(f, " {}", self.label)?;
        }
        Ok(())
    }
}
