//! Wall-clock source

use alarmclock_core::Clock;
use chrono::{Local, NaiveDateTime};

/// Local system time, without offset
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
