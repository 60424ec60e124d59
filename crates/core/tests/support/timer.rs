//! Fakes for the wake-up timer, notifier and clock ports

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use alarmclock_core::{AlarmNotifier, Clock, WakeTimer};
use alarmclock_domain::{
    AlarmError, AlarmFired, Result as DomainResult, TimerFired, TimerKey,
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};

/// Call made against the fake timer, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Arm(TimerKey, NaiveDateTime),
    Cancel(TimerKey),
}

/// In-memory `WakeTimer` honouring the one-shot contract.
///
/// Live registrations form a key -> instant map, so arming a key twice
/// leaves one registration. `take_fired` simulates the platform committing
/// to a fire: the registration is consumed and the event returned for the
/// test to deliver whenever it likes.
#[derive(Default)]
pub struct MockWakeTimer {
    live: Mutex<HashMap<TimerKey, NaiveDateTime>>,
    calls: Mutex<Vec<TimerCall>>,
    deny: AtomicBool,
}

impl MockWakeTimer {
    /// Make subsequent arm and cancel calls fail like a platform without the
    /// exact-alarm permission.
    pub fn deny(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    pub fn live(&self, key: TimerKey) -> Option<NaiveDateTime> {
        self.live.lock().unwrap().get(&key).copied()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<TimerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn take_fired(&self, key: TimerKey) -> Option<TimerFired> {
        self.live
            .lock()
            .unwrap()
            .remove(&key)
            .map(|scheduled_for| TimerFired { key, scheduled_for })
    }

    fn check_permission(&self) -> DomainResult<()> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(AlarmError::SchedulingDenied("exact alarm permission revoked".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl WakeTimer for MockWakeTimer {
    async fn arm_exact_at(&self, key: TimerKey, instant: NaiveDateTime) -> DomainResult<()> {
        self.check_permission()?;
        self.calls.lock().unwrap().push(TimerCall::Arm(key, instant));
        self.live.lock().unwrap().insert(key, instant);
        Ok(())
    }

    async fn cancel(&self, key: TimerKey) -> DomainResult<()> {
        self.check_permission()?;
        self.calls.lock().unwrap().push(TimerCall::Cancel(key));
        self.live.lock().unwrap().remove(&key);
        Ok(())
    }
}

/// Collects every `AlarmFired` it receives
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<AlarmFired>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<AlarmFired> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlarmNotifier for RecordingNotifier {
    async fn alarm_fired(&self, event: AlarmFired) -> DomainResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.now.lock().unwrap() += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}
