//! Alarm service - operations behind the alarm list and editor

use std::sync::Arc;

use alarmclock_domain::{AlarmDefinition, AlarmId, ArmState, ArmedTimer, Result};
use tracing::info;

use crate::scheduling::ports::AlarmRepository;
use crate::scheduling::AlarmTimerAdapter;

/// Alarm service
pub struct AlarmService {
    repository: Arc<dyn AlarmRepository>,
    scheduler: Arc<AlarmTimerAdapter>,
}

impl AlarmService {
    /// Create a new alarm service
    pub fn new(repository: Arc<dyn AlarmRepository>, scheduler: Arc<AlarmTimerAdapter>) -> Self {
        Self { repository, scheduler }
    }

    /// Create an enabled alarm and arm it.
    ///
    /// On `SchedulingDenied` the alarm is already stored; it shows up in
    /// [`Self::list_alarms`] and can be armed later with
    /// [`Self::reschedule`].
    pub async fn create_alarm(
        &self,
        hour: u8,
        minute: u8,
        label: impl Into<String>,
        days: impl IntoIterator<Item = u8>,
    ) -> Result<AlarmDefinition> {
        let definition = AlarmDefinition::new(hour, minute)?.with_label(label).with_days(days);
        let state = self.scheduler.apply(&definition).await?;
        info!(alarm_id = %definition.id, ?state, "alarm created");
        Ok(definition)
    }

    /// Replace an existing alarm with an edited copy; `NotFound` once the
    /// alarm has been deleted.
    pub async fn update_alarm(&self, definition: AlarmDefinition) -> Result<ArmState> {
        self.scheduler.update(&definition).await
    }

    /// Enable or disable an alarm
    pub async fn toggle_alarm(&self, id: AlarmId, enabled: bool) -> Result<ArmState> {
        self.scheduler.set_enabled(id, enabled).await
    }

    pub async fn delete_alarm(&self, id: AlarmId) -> Result<()> {
        self.scheduler.remove(id).await
    }

    /// All alarms ordered by time of day
    pub async fn list_alarms(&self) -> Result<Vec<AlarmDefinition>> {
        let mut alarms = self.repository.load_all().await?;
        alarms.sort_by_key(|alarm| (alarm.hour, alarm.minute, alarm.id));
        Ok(alarms)
    }

    pub async fn snooze(&self, id: AlarmId) -> Result<ArmedTimer> {
        self.scheduler.snooze(id).await
    }

    /// Stop a ringing alarm: drops any pending snooze
    pub async fn dismiss(&self, id: AlarmId) -> Result<bool> {
        self.scheduler.dismiss_snooze(id).await
    }

    /// Retry arming after the platform previously refused
    pub async fn reschedule(&self, id: AlarmId) -> Result<ArmState> {
        self.scheduler.sync(id).await
    }

    /// The earliest live arm across all alarms and slots
    pub fn next_alarm(&self) -> Option<ArmedTimer> {
        self.scheduler.armed_timers().into_iter().next()
    }
}
