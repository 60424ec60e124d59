//! Drains wake-up events into the timer adapter.
//!
//! The dispatcher owns the receiving end of the `TokioWakeTimer` channel
//! while running and hands it back on `stop`, so it can be restarted. Each
//! event is handled on its own task; ordering per alarm is enforced by the
//! adapter's per-alarm lock.

use std::sync::Arc;
use std::time::Duration;

use alarmclock_core::AlarmTimerAdapter;
use alarmclock_domain::{FireOutcome, TimerFired};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, instrument};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

type EventReceiver = mpsc::Receiver<TimerFired>;

/// Background task feeding `TimerFired` events to `AlarmTimerAdapter::on_fired`
pub struct FiredEventDispatcher {
    adapter: Arc<AlarmTimerAdapter>,
    receiver: Option<EventReceiver>,
    cancellation_token: CancellationToken,
    task_handle: Option<JoinHandle<EventReceiver>>,
    handlers: TaskTracker,
}

impl FiredEventDispatcher {
    pub fn new(adapter: Arc<AlarmTimerAdapter>, receiver: EventReceiver) -> Self {
        Self {
            adapter,
            receiver: Some(receiver),
            cancellation_token: CancellationToken::new(),
            task_handle: None,
            handlers: TaskTracker::new(),
        }
    }

    /// Start draining events
    ///
    /// # Errors
    ///
    /// Returns error if the dispatcher is already running or a previous run
    /// did not hand its receiver back
    #[instrument(skip(self))]
    pub fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        let receiver = self.receiver.take().ok_or(SchedulerError::ReceiverUnavailable)?;

        // Fresh token so a stopped dispatcher can be started again
        self.cancellation_token = CancellationToken::new();
        self.handlers.reopen();

        let adapter = Arc::clone(&self.adapter);
        let cancel = self.cancellation_token.clone();
        let handlers = self.handlers.clone();
        self.task_handle =
            Some(tokio::spawn(Self::dispatch_loop(adapter, receiver, cancel, handlers)));

        info!("Fired-event dispatcher started");
        Ok(())
    }

    /// Stop the loop and wait for in-flight handlers
    ///
    /// # Errors
    ///
    /// Returns error if the dispatcher is not running or shutdown exceeds the
    /// join timeout
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping fired-event dispatcher");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.take() {
            let receiver = tokio::time::timeout(JOIN_TIMEOUT, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: JOIN_TIMEOUT.as_secs() })??;
            self.receiver = Some(receiver);
        }

        self.handlers.close();
        tokio::time::timeout(JOIN_TIMEOUT, self.handlers.wait())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: JOIN_TIMEOUT.as_secs() })?;

        info!("Fired-event dispatcher stopped");
        Ok(())
    }

    /// A dispatcher is running while its loop task has not finished.
    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn dispatch_loop(
        adapter: Arc<AlarmTimerAdapter>,
        mut receiver: EventReceiver,
        cancel: CancellationToken,
        handlers: TaskTracker,
    ) -> EventReceiver {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Dispatch loop cancelled");
                    break;
                }
                event = receiver.recv() => {
                    let Some(event) = event else {
                        debug!("Wake-up channel closed");
                        break;
                    };
                    let adapter = Arc::clone(&adapter);
                    handlers.spawn(async move {
                        match adapter.on_fired(event).await {
                            Ok(FireOutcome::Ignored) => {
                                debug!(key = %event.key, "stale wake-up ignored");
                            }
                            Ok(outcome) => debug!(key = %event.key, ?outcome, "wake-up handled"),
                            Err(e) => error!(key = %event.key, error = %e, "Failed to handle wake-up"),
                        }
                    });
                }
            }
        }
        receiver
    }
}
