//! Timer adapter - keeps platform wake-up timers in line with alarm state
//!
//! Each alarm owns two independent timer slots: the primary slot driven by
//! the recurrence resolver and a snooze slot armed at a fixed offset from
//! "now". Every transition for one alarm (edit, toggle, delete, fire,
//! snooze) runs under that alarm's own async mutex, and the repository
//! write happens inside the same critical section as the arm or cancel.
//! An edit racing a fire is therefore strictly ordered, and the fire event
//! of a replaced arm no longer matches the armed table and is dropped.

use std::sync::Arc;
use std::time::Duration;

use alarmclock_domain::{
    AlarmDefinition, AlarmError, AlarmFired, AlarmId, ArmState, ArmedTimer, FireOutcome, Result,
    TimerFired, TimerKey, TimerSlot,
};
use chrono::NaiveDateTime;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

use super::ports::{AlarmNotifier, AlarmRepository, Clock, WakeTimer};
use crate::recurrence::{next_fire_instant, snooze_instant};

/// Summary of re-arming stored alarms at start-up
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Alarms whose primary slot is now armed
    pub armed: usize,
    /// Disabled alarms left untouched
    pub skipped: usize,
    /// Alarms that could not be armed, with the reason
    pub failed: Vec<(AlarmId, AlarmError)>,
}

/// Bridges alarm definitions to the one-shot [`WakeTimer`] port
pub struct AlarmTimerAdapter {
    repository: Arc<dyn AlarmRepository>,
    timer: Arc<dyn WakeTimer>,
    notifier: Arc<dyn AlarmNotifier>,
    clock: Arc<dyn Clock>,
    snooze_offset: Duration,
    locks: DashMap<AlarmId, Arc<Mutex<()>>>,
    armed: DashMap<TimerKey, NaiveDateTime>,
}

impl AlarmTimerAdapter {
    /// Create a new adapter
    ///
    /// # Arguments
    ///
    /// * `repository` - Alarm definition storage
    /// * `timer` - Platform one-shot wake-up timer
    /// * `notifier` - Presentation layer receiving ringing alarms
    /// * `clock` - Local wall clock
    /// * `snooze_offset` - Delay applied by [`Self::snooze`]
    pub fn new(
        repository: Arc<dyn AlarmRepository>,
        timer: Arc<dyn WakeTimer>,
        notifier: Arc<dyn AlarmNotifier>,
        clock: Arc<dyn Clock>,
        snooze_offset: Duration,
    ) -> Self {
        Self {
            repository,
            timer,
            notifier,
            clock,
            snooze_offset,
            locks: DashMap::new(),
            armed: DashMap::new(),
        }
    }

    /// Persist `definition` and bring its primary timer in line with it.
    ///
    /// Covers create, edit, enable and disable. Disabling also drops a
    /// pending snooze. An edit that leaves time, days and enabled state
    /// unchanged keeps the live arm.
    ///
    /// # Errors
    /// - `InvalidDefinition` before anything is stored
    /// - `SchedulingDenied` if the timer refused; the definition is stored
    ///   as given and stays enabled but un-armed until [`Self::sync`]
    #[instrument(skip(self, definition), fields(alarm_id = %definition.id))]
    pub async fn apply(&self, definition: &AlarmDefinition) -> Result<ArmState> {
        definition.validate()?;
        let _guard = self.lock(definition.id).await;

        let previous = self.repository.get(definition.id).await?;
        self.store_and_reconcile(definition, previous.as_ref()).await
    }

    /// Like [`Self::apply`], but only for an alarm that is still stored.
    ///
    /// # Errors
    /// `NotFound` if the alarm was deleted, otherwise as [`Self::apply`].
    #[instrument(skip(self, definition), fields(alarm_id = %definition.id))]
    pub async fn update(&self, definition: &AlarmDefinition) -> Result<ArmState> {
        definition.validate()?;
        let _guard = self.lock(definition.id).await;

        let previous = self.require(definition.id).await?;
        self.store_and_reconcile(definition, Some(&previous)).await
    }

    /// Enable or disable a stored alarm, keeping the rest of its stored
    /// definition.
    ///
    /// # Errors
    /// `NotFound` for an unknown alarm, otherwise as [`Self::apply`].
    #[instrument(skip(self))]
    pub async fn set_enabled(&self, id: AlarmId, enabled: bool) -> Result<ArmState> {
        let _guard = self.lock(id).await;

        let previous = self.require(id).await?;
        let definition = previous.clone().with_enabled(enabled);
        self.store_and_reconcile(&definition, Some(&previous)).await
    }

    /// Re-read a stored alarm and re-arm it; the explicit retry after a
    /// `SchedulingDenied`.
    ///
    /// # Errors
    /// `NotFound` if the alarm does not exist, otherwise as [`Self::apply`].
    #[instrument(skip(self))]
    pub async fn sync(&self, id: AlarmId) -> Result<ArmState> {
        let _guard = self.lock(id).await;
        let definition = self.require(id).await?;
        self.reconcile_primary(&definition).await
    }

    /// Delete an alarm and cancel both of its slots.
    ///
    /// Cancel failures are logged only: the armed table forgets the keys, so
    /// a late fire is ignored.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: AlarmId) -> Result<()> {
        let guard = self.lock(id).await;

        for key in [TimerKey::primary(id), TimerKey::snooze(id)] {
            if let Err(err) = self.disarm(key).await {
                warn!(key = %key, error = %err, "failed to cancel timer for deleted alarm");
                self.armed.remove(&key);
            }
        }
        self.repository.delete(id).await?;

        // Only the registry and this guard hold the mutex: nobody is queued.
        self.locks.remove_if(&id, |_, mutex| Arc::strong_count(mutex) <= 2);
        drop(guard);

        info!("alarm deleted");
        Ok(())
    }

    /// Handle a fired timer event.
    ///
    /// Repeating alarms are re-armed from the instant they were scheduled
    /// for; if delivery was late enough that this lands in the past, from
    /// now instead. One-shot alarms are disabled and stored. Unknown or
    /// superseded keys are ignored.
    #[instrument(skip(self), fields(key = %event.key, scheduled_for = %event.scheduled_for))]
    pub async fn on_fired(&self, event: TimerFired) -> Result<FireOutcome> {
        let key = event.key;
        let _guard = self.lock(key.alarm_id).await;

        match self.armed_at(key) {
            Some(at) if at == event.scheduled_for => {
                self.armed.remove(&key);
            }
            Some(at) => {
                debug!(armed_for = %at, "fire event superseded by a newer arm");
                return Ok(FireOutcome::Ignored);
            }
            None => {
                debug!("fire event for a key that is not armed");
                return Ok(FireOutcome::Ignored);
            }
        }

        let Some(mut definition) = self.repository.get(key.alarm_id).await? else {
            debug!("fired alarm no longer exists");
            return Ok(FireOutcome::Ignored);
        };
        if key.slot == TimerSlot::Primary && !definition.enabled {
            return Ok(FireOutcome::Ignored);
        }

        self.notify(&definition, key.slot).await;

        if key.is_snooze() {
            return Ok(FireOutcome::SnoozeFinished);
        }

        if definition.is_repeating() {
            let mut next = next_fire_instant(&definition, event.scheduled_for)?;
            let now = self.clock.now();
            if next <= now {
                debug!(stale = %next, "late delivery, resolving from now");
                next = next_fire_instant(&definition, now)?;
            }
            self.arm(key, next).await?;
            info!(next = %next, "repeating alarm re-armed");
            return Ok(FireOutcome::Rearmed(next));
        }

        definition.enabled = false;
        self.repository.save(&definition).await?;
        info!("one-shot alarm disabled after firing");
        Ok(FireOutcome::Disabled)
    }

    /// Arm the snooze slot at now plus the configured offset. The primary
    /// slot is left alone.
    ///
    /// # Errors
    /// `NotFound` for an unknown alarm, `SchedulingDenied` if the timer
    /// refused.
    #[instrument(skip(self))]
    pub async fn snooze(&self, id: AlarmId) -> Result<ArmedTimer> {
        let _guard = self.lock(id).await;
        self.require(id).await?;

        let key = TimerKey::snooze(id);
        let fire_at = snooze_instant(self.clock.now(), self.snooze_offset)?;
        self.disarm(key).await?;
        self.arm(key, fire_at).await?;
        info!(fire_at = %fire_at, "snooze armed");
        Ok(ArmedTimer { key, fire_at })
    }

    /// Cancel a pending snooze. Returns whether one was armed.
    #[instrument(skip(self))]
    pub async fn dismiss_snooze(&self, id: AlarmId) -> Result<bool> {
        let _guard = self.lock(id).await;
        self.disarm(TimerKey::snooze(id)).await
    }

    /// Re-arm every enabled stored alarm. Platform timers do not survive a
    /// reboot or process death, so this runs at start-up.
    #[instrument(skip(self))]
    pub async fn restore_all(&self) -> Result<RestoreReport> {
        let mut report = RestoreReport::default();

        for definition in self.repository.load_all().await? {
            if !definition.enabled {
                report.skipped += 1;
                continue;
            }
            let _guard = self.lock(definition.id).await;
            match self.reconcile_primary(&definition).await {
                Ok(_) => report.armed += 1,
                Err(err) => {
                    warn!(alarm_id = %definition.id, error = %err, "failed to restore alarm");
                    report.failed.push((definition.id, err));
                }
            }
        }

        info!(
            armed = report.armed,
            skipped = report.skipped,
            failed = report.failed.len(),
            "alarms restored"
        );
        Ok(report)
    }

    /// Instant `key` is currently armed for, if any
    pub fn armed_at(&self, key: TimerKey) -> Option<NaiveDateTime> {
        self.armed.get(&key).map(|entry| *entry.value())
    }

    /// Snapshot of every live arm, ordered by fire time
    pub fn armed_timers(&self) -> Vec<ArmedTimer> {
        let mut timers: Vec<ArmedTimer> = self
            .armed
            .iter()
            .map(|entry| ArmedTimer { key: *entry.key(), fire_at: *entry.value() })
            .collect();
        timers.sort_by_key(|timer| (timer.fire_at, timer.key));
        timers
    }

    /// Number of alarms with a lock registered
    pub fn tracked_alarms(&self) -> usize {
        self.locks.len()
    }

    async fn require(&self, id: AlarmId) -> Result<AlarmDefinition> {
        self.repository.get(id).await?.ok_or_else(|| AlarmError::NotFound(format!("alarm {id}")))
    }

    /// Store `definition`, then reconcile its slots against `previous`.
    /// Callers hold the alarm's lock.
    async fn store_and_reconcile(
        &self,
        definition: &AlarmDefinition,
        previous: Option<&AlarmDefinition>,
    ) -> Result<ArmState> {
        self.repository.save(definition).await?;

        let primary = TimerKey::primary(definition.id);
        if let (Some(previous), Some(at)) = (previous, self.armed_at(primary)) {
            if definition.enabled && !definition.schedule_differs(previous) {
                debug!(fire_at = %at, "schedule unchanged, keeping live arm");
                return Ok(ArmState::Armed(at));
            }
        }

        if !definition.enabled {
            self.disarm(TimerKey::snooze(definition.id)).await?;
        }
        self.reconcile_primary(definition).await
    }

    /// Cancel any live primary arm, then arm again if enabled.
    async fn reconcile_primary(&self, definition: &AlarmDefinition) -> Result<ArmState> {
        let key = TimerKey::primary(definition.id);
        self.disarm(key).await?;

        if !definition.enabled {
            debug!("alarm disabled, primary slot disarmed");
            return Ok(ArmState::Disarmed);
        }

        let fire_at = next_fire_instant(definition, self.clock.now())?;
        self.arm(key, fire_at).await?;
        info!(fire_at = %fire_at, "alarm armed");
        Ok(ArmState::Armed(fire_at))
    }

    async fn arm(&self, key: TimerKey, fire_at: NaiveDateTime) -> Result<()> {
        self.timer.arm_exact_at(key, fire_at).await.map_err(|err| denied("arm", key, err))?;
        self.armed.insert(key, fire_at);
        Ok(())
    }

    /// Cancel `key` if the table says it is live. The entry is kept when the
    /// cancel fails so the arm is not forgotten while still registered.
    async fn disarm(&self, key: TimerKey) -> Result<bool> {
        if self.armed_at(key).is_none() {
            return Ok(false);
        }
        self.timer.cancel(key).await.map_err(|err| denied("cancel", key, err))?;
        self.armed.remove(&key);
        Ok(true)
    }

    async fn notify(&self, definition: &AlarmDefinition, slot: TimerSlot) {
        let event = AlarmFired {
            alarm_id: definition.id,
            label: definition.label.clone(),
            fired_at: self.clock.now(),
            slot,
        };
        if let Err(err) = self.notifier.alarm_fired(event).await {
            warn!(error = %err, "notifier failed to present alarm");
        }
    }

    async fn lock(&self, id: AlarmId) -> OwnedMutexGuard<()> {
        let mutex = Arc::clone(self.locks.entry(id).or_default().value());
        mutex.lock_owned().await
    }
}

fn denied(operation: &str, key: TimerKey, err: AlarmError) -> AlarmError {
    match err {
        AlarmError::SchedulingDenied(_) => err,
        other => AlarmError::SchedulingDenied(format!("{operation} {key}: {other}")),
    }
}
