//! Runtime wiring
//!
//! Builds the SQLite repository, wake timer, notifier, timer adapter and
//! dispatcher from a [`Config`], re-arms stored alarms and exposes the
//! [`AlarmService`] used by the editor surface.

use std::sync::Arc;

use alarmclock_core::{AlarmRepository, AlarmService, AlarmTimerAdapter, Clock, RestoreReport};
use alarmclock_domain::{AlarmFired, Config, Result};
use tokio::sync::broadcast;
use tokio::task;
use tracing::{info, warn};

use crate::clock::SystemClock;
use crate::database::{DbManager, SqliteAlarmRepository};
use crate::errors::InfraError;
use crate::notification::BroadcastNotifier;
use crate::scheduling::{FiredEventDispatcher, TokioWakeTimer};

/// A running alarm clock
pub struct AlarmRuntime {
    db: Arc<DbManager>,
    timer: Arc<TokioWakeTimer>,
    notifier: Arc<BroadcastNotifier>,
    adapter: Arc<AlarmTimerAdapter>,
    service: Arc<AlarmService>,
    dispatcher: FiredEventDispatcher,
    restore: RestoreReport,
}

impl AlarmRuntime {
    /// Start against the local system clock.
    pub async fn start(config: &Config) -> Result<Self> {
        Self::start_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Start with an explicit clock
    ///
    /// # Errors
    /// Fails on invalid configuration, database errors, or if stored alarms
    /// cannot be loaded. Individual alarms that cannot be armed are reported
    /// in [`Self::restore_report`] instead.
    pub async fn start_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let path = config.database.path.clone();
        let pool_size = config.database.pool_size;
        let db = task::spawn_blocking(move || -> Result<DbManager> {
            let db = DbManager::new(&path, pool_size)?;
            db.run_migrations()?;
            Ok(db)
        })
        .await
        .map_err(InfraError::from)??;
        let db = Arc::new(db);

        let repository: Arc<dyn AlarmRepository> =
            Arc::new(SqliteAlarmRepository::new(Arc::clone(&db)));
        let (timer, receiver) =
            TokioWakeTimer::channel(Arc::clone(&clock), config.scheduling.event_buffer);
        let timer = Arc::new(timer);
        let notifier = Arc::new(BroadcastNotifier::new(config.scheduling.event_buffer));

        let adapter = Arc::new(AlarmTimerAdapter::new(
            Arc::clone(&repository),
            timer.clone(),
            notifier.clone(),
            clock,
            config.scheduling.snooze_offset(),
        ));

        let restore = adapter.restore_all().await?;
        for (alarm_id, error) in &restore.failed {
            warn!(%alarm_id, %error, "alarm not re-armed");
        }

        let mut dispatcher = FiredEventDispatcher::new(Arc::clone(&adapter), receiver);
        dispatcher.start()?;

        let service = Arc::new(AlarmService::new(repository, Arc::clone(&adapter)));

        info!(
            db_path = %db.path().display(),
            armed = restore.armed,
            skipped = restore.skipped,
            failed = restore.failed.len(),
            "alarm runtime started"
        );

        Ok(Self { db, timer, notifier, adapter, service, dispatcher, restore })
    }

    pub fn service(&self) -> Arc<AlarmService> {
        Arc::clone(&self.service)
    }

    pub fn adapter(&self) -> Arc<AlarmTimerAdapter> {
        Arc::clone(&self.adapter)
    }

    /// Receive ringing alarms.
    pub fn subscribe(&self) -> broadcast::Receiver<AlarmFired> {
        self.notifier.subscribe()
    }

    /// What start-up re-arming did
    pub fn restore_report(&self) -> &RestoreReport {
        &self.restore
    }

    pub fn database(&self) -> &DbManager {
        &self.db
    }

    /// Cancel pending wake-ups and stop the dispatcher.
    ///
    /// Stored alarms are untouched; the next start re-arms them.
    pub async fn shutdown(mut self) -> Result<()> {
        self.timer.cancel_all();
        if self.dispatcher.is_running() {
            self.dispatcher.stop().await?;
        }
        info!("alarm runtime stopped");
        Ok(())
    }
}
