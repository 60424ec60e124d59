//! Shared test helpers for `alarmclock-core` integration tests.
//!
//! In-memory fakes for every scheduling port plus a few fixtures, so the
//! suites can focus on behaviour instead of boilerplate.
#![allow(dead_code)]

pub mod repositories;
pub mod timer;

use std::sync::Arc;
use std::time::Duration;

use alarmclock_core::{AlarmService, AlarmTimerAdapter};
use alarmclock_domain::{AlarmDefinition, AlarmId};
use chrono::{NaiveDate, NaiveDateTime};

pub use repositories::MockAlarmRepository;
pub use timer::{FixedClock, MockWakeTimer, RecordingNotifier, TimerCall};

pub const SNOOZE: Duration = Duration::from_secs(5 * 60);

/// Local instant in the first week of January 2024. Day 1 is a Monday, so
/// `at(3, ..)` is a Wednesday.
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid fixture instant")
}

pub fn alarm(hour: u8, minute: u8, days: &[u8]) -> AlarmDefinition {
    AlarmDefinition {
        id: AlarmId::new(),
        hour,
        minute,
        enabled: true,
        label: String::new(),
        days: days.iter().copied().collect(),
    }
}

/// Adapter wired to fresh fakes
pub struct Harness {
    pub repository: Arc<MockAlarmRepository>,
    pub timer: Arc<MockWakeTimer>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
    pub adapter: Arc<AlarmTimerAdapter>,
}

impl Harness {
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_repository(now, MockAlarmRepository::default())
    }

    pub fn with_repository(now: NaiveDateTime, repository: MockAlarmRepository) -> Self {
        let repository = Arc::new(repository);
        let timer = Arc::new(MockWakeTimer::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let clock = Arc::new(FixedClock::new(now));
        let adapter = Arc::new(AlarmTimerAdapter::new(
            repository.clone(),
            timer.clone(),
            notifier.clone(),
            clock.clone(),
            SNOOZE,
        ));
        Self { repository, timer, notifier, clock, adapter }
    }

    pub fn service(&self) -> AlarmService {
        AlarmService::new(self.repository.clone(), self.adapter.clone())
    }
}
