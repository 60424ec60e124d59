//! One-shot wake-up timer running on the tokio runtime.
//!
//! Every armed key owns a sleeping task guarded by a `CancellationToken`.
//! Re-arming a key cancels the previous task, so a key produces at most one
//! `TimerFired` per arm. The delay is computed from the injected `Clock` at
//! arm time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alarmclock_core::{Clock, WakeTimer};
use alarmclock_domain::{AlarmError, Result, TimerFired, TimerKey};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct Sleeper {
    fire_at: NaiveDateTime,
    generation: u64,
    cancel: CancellationToken,
}

type SleeperMap = Arc<Mutex<HashMap<TimerKey, Sleeper>>>;

/// `WakeTimer` implementation backed by `tokio::time::sleep`
pub struct TokioWakeTimer {
    clock: Arc<dyn Clock>,
    sender: mpsc::Sender<TimerFired>,
    sleepers: SleeperMap,
    generation: AtomicU64,
}

impl TokioWakeTimer {
    /// Create a timer and the receiving end of its fired-event channel.
    pub fn channel(clock: Arc<dyn Clock>, buffer: usize) -> (Self, mpsc::Receiver<TimerFired>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let timer = Self {
            clock,
            sender,
            sleepers: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        };
        (timer, receiver)
    }

    /// Number of keys currently waiting to fire
    pub fn armed_count(&self) -> usize {
        self.sleepers.lock().len()
    }

    /// Instant `key` is waiting for, if armed
    pub fn fire_at(&self, key: &TimerKey) -> Option<NaiveDateTime> {
        self.sleepers.lock().get(key).map(|sleeper| sleeper.fire_at)
    }

    /// Cancel every pending sleeper.
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.sleepers.lock().drain().collect();
        for (_, sleeper) in &drained {
            sleeper.cancel.cancel();
        }
        debug!(cancelled = drained.len(), "wake timer cleared");
    }

    fn delay_until(&self, instant: NaiveDateTime) -> Duration {
        (instant - self.clock.now()).to_std().unwrap_or(Duration::ZERO)
    }
}

#[async_trait]
impl WakeTimer for TokioWakeTimer {
    async fn arm_exact_at(&self, key: TimerKey, instant: NaiveDateTime) -> Result<()> {
        if self.sender.is_closed() {
            return Err(AlarmError::SchedulingDenied("wake-up event channel is closed".into()));
        }

        let delay = self.delay_until(instant);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        let replaced = self.sleepers.lock().insert(
            key,
            Sleeper { fire_at: instant, generation, cancel: cancel.clone() },
        );
        if let Some(previous) = replaced {
            previous.cancel.cancel();
        }

        let sleepers = Arc::clone(&self.sleepers);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let current = {
                        let mut guard = sleepers.lock();
                        match guard.get(&key) {
                            Some(sleeper) if sleeper.generation == generation => {
                                guard.remove(&key);
                                true
                            }
                            _ => false,
                        }
                    };
                    if !current {
                        return;
                    }
                    let event = TimerFired { key, scheduled_for: instant };
                    if sender.send(event).await.is_err() {
                        warn!(%key, "fired event dropped, receiver closed");
                    }
                }
            }
        });

        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        debug!(%key, fire_at = %instant, delay_ms, "wake timer armed");
        Ok(())
    }

    async fn cancel(&self, key: TimerKey) -> Result<()> {
        if let Some(sleeper) = self.sleepers.lock().remove(&key) {
            sleeper.cancel.cancel();
            debug!(%key, "wake timer cancelled");
        }
        Ok(())
    }
}
