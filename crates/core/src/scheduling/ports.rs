//! Port interfaces for alarm scheduling
//!
//! These traits define the boundaries between the scheduling core and its
//! collaborators: storage, the platform wake-up timer, the presentation
//! layer and the wall clock.

use alarmclock_domain::{AlarmDefinition, AlarmFired, AlarmId, Result, TimerKey};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Trait for persisting alarm definitions
#[async_trait]
pub trait AlarmRepository: Send + Sync {
    /// Load every stored definition
    async fn load_all(&self) -> Result<Vec<AlarmDefinition>>;

    /// Get a single definition by id
    async fn get(&self, id: AlarmId) -> Result<Option<AlarmDefinition>>;

    /// Insert or replace a definition
    async fn save(&self, definition: &AlarmDefinition) -> Result<()>;

    /// Delete a definition; deleting a missing id is not an error
    async fn delete(&self, id: AlarmId) -> Result<()>;
}

/// One-shot wake-up timer provided by the platform.
///
/// Arming a key that is already armed replaces the previous registration.
/// Expiry is reported out of band as a `TimerFired` event, at most once per
/// arm.
#[async_trait]
pub trait WakeTimer: Send + Sync {
    /// Register `key` to fire at `instant`
    async fn arm_exact_at(&self, key: TimerKey, instant: NaiveDateTime) -> Result<()>;

    /// Remove any registration for `key`; cancelling an unknown key succeeds
    async fn cancel(&self, key: TimerKey) -> Result<()>;
}

/// Trait for presenting a ringing alarm to the user
#[async_trait]
pub trait AlarmNotifier: Send + Sync {
    async fn alarm_fired(&self, event: AlarmFired) -> Result<()>;
}

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
