//! Mock repository implementations for testing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alarmclock_core::AlarmRepository;
use alarmclock_domain::{AlarmDefinition, AlarmId, Result as DomainResult};
use async_trait::async_trait;
use tokio::sync::Notify;

/// Pauses one repository read until the test releases it
#[derive(Default)]
pub struct ReadGate {
    /// Signalled once the paused read has started
    pub reached: Notify,
    /// Notify to let the paused read return
    pub release: Notify,
}

/// In-memory mock for `AlarmRepository`.
///
/// Keeps definitions in a map and counts writes so tests can assert on
/// persistence traffic.
#[derive(Default, Clone)]
pub struct MockAlarmRepository {
    alarms: Arc<Mutex<HashMap<AlarmId, AlarmDefinition>>>,
    saves: Arc<Mutex<usize>>,
    gate: Arc<Mutex<Option<Arc<ReadGate>>>>,
}

impl MockAlarmRepository {
    /// Create a new mock seeded with the provided definitions.
    pub fn new(alarms: Vec<AlarmDefinition>) -> Self {
        let map = alarms.into_iter().map(|alarm| (alarm.id, alarm)).collect();
        Self { alarms: Arc::new(Mutex::new(map)), ..Self::default() }
    }

    pub fn stored(&self, id: AlarmId) -> Option<AlarmDefinition> {
        self.alarms.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.alarms.lock().unwrap().len()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    /// Make the next `get` wait on the returned gate.
    pub fn pause_next_get(&self) -> Arc<ReadGate> {
        let gate = Arc::new(ReadGate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl AlarmRepository for MockAlarmRepository {
    async fn load_all(&self) -> DomainResult<Vec<AlarmDefinition>> {
        Ok(self.alarms.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: AlarmId) -> DomainResult<Option<AlarmDefinition>> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        Ok(self.stored(id))
    }

    async fn save(&self, definition: &AlarmDefinition) -> DomainResult<()> {
        self.alarms.lock().unwrap().insert(definition.id, definition.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn delete(&self, id: AlarmId) -> DomainResult<()> {
        self.alarms.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::alarm;

    #[tokio::test]
    async fn test_mock_alarm_repository() {
        // Arrange
        let first = alarm(7, 0, &[]);
        let second = alarm(8, 30, &[1, 2]);
        let repo = MockAlarmRepository::new(vec![first.clone()]);

        // Act
        repo.save(&second).await.unwrap();
        repo.delete(first.id).await.unwrap();

        // Assert
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(second.id).await.unwrap(), Some(second));
        assert_eq!(repo.get(first.id).await.unwrap(), None);
        assert_eq!(repo.save_count(), 1);
    }
}
