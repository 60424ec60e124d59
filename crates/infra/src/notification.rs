//! Ringing-alarm fan-out
//!
//! Every fired alarm is logged and broadcast to all current subscribers.
//! Having no subscriber is not an error: the alarm still rang, nobody was
//! listening.

use alarmclock_core::AlarmNotifier;
use alarmclock_domain::{AlarmFired, Result};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// `AlarmNotifier` backed by a tokio broadcast channel
pub struct BroadcastNotifier {
    sender: broadcast::Sender<AlarmFired>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every alarm fired from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AlarmFired> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl AlarmNotifier for BroadcastNotifier {
    async fn alarm_fired(&self, event: AlarmFired) -> Result<()> {
        info!(
            alarm_id = %event.alarm_id,
            slot = %event.slot,
            label = %event.label,
            fired_at = %event.fired_at,
            "alarm ringing"
        );
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "alarm broadcast"),
            Err(_) => debug!("alarm broadcast with no subscribers"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alarmclock_domain::{AlarmId, TimerSlot};
    use chrono::NaiveDate;

    use super::*;

    fn event() -> AlarmFired {
        AlarmFired {
            alarm_id: AlarmId::new(),
            label: "Wake".into(),
            fired_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(7, 0, 0).unwrap(),
            slot: TimerSlot::Primary,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_fired_alarm() {
        let notifier = BroadcastNotifier::new(4);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();
        let fired = event();

        notifier.alarm_fired(fired.clone()).await.unwrap();

        assert_eq!(first.recv().await.unwrap(), fired);
        assert_eq!(second.recv().await.unwrap(), fired);
    }

    #[tokio::test]
    async fn no_subscribers_is_not_an_error() {
        let notifier = BroadcastNotifier::new(4);
        assert!(notifier.alarm_fired(event()).await.is_ok());
    }
}
