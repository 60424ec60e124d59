//! Recurrence resolution
//!
//! Computes the next local wall-clock instant an alarm should ring. Every
//! function here is pure: "now" is always passed in.

use std::time::Duration;

use alarmclock_domain::constants::DAYS_PER_WEEK;
use alarmclock_domain::{AlarmDefinition, AlarmError, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta};

/// Next instant strictly after `now` at which `definition` should fire.
///
/// One-shot alarms ring today if the time is still ahead, otherwise tomorrow.
/// Repeating alarms ring on the earliest matching weekday within the next
/// week; today only counts while its time has not passed.
///
/// # Errors
/// Returns `AlarmError::InvalidDefinition` for out-of-range hour, minute or
/// repeat day.
pub fn next_fire_instant(definition: &AlarmDefinition, now: NaiveDateTime) -> Result<NaiveDateTime> {
    definition.validate()?;
    let time = definition.time_of_day()?;
    let today = now.date();

    if !definition.is_repeating() {
        let candidate = today.and_time(time);
        if candidate > now {
            return Ok(candidate);
        }
        return Ok(add_days(today, 1)?.and_time(time));
    }

    // Offset 7 covers "today's weekday, but its time already passed".
    for offset in 0..=u64::from(DAYS_PER_WEEK) {
        let day = add_days(today, offset)?;
        if !definition.repeats_on(day.weekday()) {
            continue;
        }
        let candidate = day.and_time(time);
        if candidate > now {
            return Ok(candidate);
        }
    }

    Err(AlarmError::Internal(format!(
        "no fire instant found within a week for alarm {}",
        definition.id
    )))
}

/// Instant a snooze requested at `now` should ring.
///
/// # Errors
/// Returns `AlarmError::Internal` if the offset overflows the calendar.
pub fn snooze_instant(now: NaiveDateTime, offset: Duration) -> Result<NaiveDateTime> {
    TimeDelta::from_std(offset)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| AlarmError::Internal(format!("snooze offset {offset:?} overflows {now}")))
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| AlarmError::Internal(format!("date overflow adding {days} days to {date}")))
}
