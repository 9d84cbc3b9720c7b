//! The `VoteTracker` owns the production and test environments: their stores,
//! their reminder schedulers and the shared signal bus. It is the surface the
//! host application talks to.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vote_reminder_repository::{SqliteVoteStore, StoreConfig, VoteStore};
use vote_reminder_shared::types::{Environment, Signal, VoteEvent};

use crate::dispatcher::WebhookDispatcher;
use crate::errors::TrackerError;
use crate::scheduler::{ReminderScheduler, SchedulerConfig};
use crate::signals::SignalBus;

/// Configuration of both environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub production: StoreConfig,
    pub test: StoreConfig,
    pub production_schedule: SchedulerConfig,
    pub test_schedule: SchedulerConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            production: StoreConfig::default(),
            test: StoreConfig::test_default(),
            production_schedule: SchedulerConfig::default(),
            test_schedule: SchedulerConfig::default(),
        }
    }
}

/// Tracks votes for both environments and schedules their reminders.
///
/// Lifecycle: [`VoteTracker::init`] initializes both stores and starts both
/// schedulers; [`VoteTracker::shutdown`] stops the schedulers and closes the
/// stores.
pub struct VoteTracker {
    production: Arc<dyn VoteStore>,
    test: Arc<dyn VoteStore>,
    signals: SignalBus,
    dispatcher: WebhookDispatcher,
    production_schedule: SchedulerConfig,
    test_schedule: SchedulerConfig,
    shutdown_tx: broadcast::Sender<()>,
    schedulers: Mutex<Vec<JoinHandle<()>>>,
}

impl VoteTracker {
    /// Creates a tracker backed by SQLite stores.
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_stores(
            Arc::new(SqliteVoteStore::new(config.production)),
            Arc::new(SqliteVoteStore::new(config.test)),
            config.production_schedule,
            config.test_schedule,
        )
    }

    /// Creates a tracker over arbitrary store implementations.
    pub fn with_stores(
        production: Arc<dyn VoteStore>,
        test: Arc<dyn VoteStore>,
        production_schedule: SchedulerConfig,
        test_schedule: SchedulerConfig,
    ) -> Self {
        let signals = SignalBus::default();
        let dispatcher =
            WebhookDispatcher::new(Arc::clone(&production), Arc::clone(&test), signals.clone());
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            production,
            test,
            signals,
            dispatcher,
            production_schedule,
            test_schedule,
            shutdown_tx,
            schedulers: Mutex::new(Vec::new()),
        }
    }

    /// Initializes both stores, then starts both reminder schedulers.
    ///
    /// Nothing is started if either store fails to initialize, and a
    /// production store that was already opened is closed again.
    pub async fn init(&self) -> Result<(), TrackerError> {
        let mut schedulers = self.schedulers.lock().await;
        if !schedulers.is_empty() {
            return Err(TrackerError::AlreadyRunning);
        }

        self.production.init().await?;
        if let Err(e) = self.test.init().await {
            // Both stores become ready together or not at all.
            self.production.close().await;
            return Err(e.into());
        }

        for (environment, config) in [
            (Environment::Production, self.production_schedule.clone()),
            (Environment::Test, self.test_schedule.clone()),
        ] {
            let scheduler = ReminderScheduler::new(
                environment,
                Arc::clone(self.store(environment)),
                self.signals.clone(),
                config,
            );
            let shutdown_rx = self.shutdown_tx.subscribe();
            schedulers.push(tokio::spawn(scheduler.run(shutdown_rx)));
        }

        info!("Vote tracker initialized");
        Ok(())
    }

    /// Stops both schedulers, waits for in-flight sweeps, then closes both
    /// stores.
    pub async fn shutdown(&self) {
        let handles: Vec<_> = self.schedulers.lock().await.drain(..).collect();
        let _ = self.shutdown_tx.send(());

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Reminder scheduler task ended abnormally");
            }
        }

        self.production.close().await;
        self.test.close().await;
        info!("Vote tracker shut down");
    }

    pub fn store(&self, environment: Environment) -> &Arc<dyn VoteStore> {
        match environment {
            Environment::Production => &self.production,
            Environment::Test => &self.test,
        }
    }

    pub fn signals(&self) -> &SignalBus {
        &self.signals
    }

    /// Subscribes to vote and reminder signals of both environments.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.signals.subscribe()
    }

    /// Hands a validated vote event to the dispatcher. See
    /// [`WebhookDispatcher::dispatch`].
    pub fn handle_vote(&self, event: VoteEvent) -> JoinHandle<()> {
        self.dispatcher.dispatch(event)
    }

    /// Whether `subject_id` has a vote that has not been swept yet.
    pub async fn has_voted(
        &self,
        subject_id: &str,
        environment: Environment,
    ) -> Result<bool, TrackerError> {
        Ok(self.voted_at(subject_id, environment).await?.is_some())
    }

    /// Time of the subject's vote, if it has not been swept yet.
    pub async fn voted_at(
        &self,
        subject_id: &str,
        environment: Environment,
    ) -> Result<Option<DateTime<Utc>>, TrackerError> {
        let record = self.store(environment).get_vote(subject_id).await?;
        Ok(record.map(|record| record.voted_at))
    }

    pub async fn opt_in(
        &self,
        subject_id: &str,
        environment: Environment,
    ) -> Result<bool, TrackerError> {
        Ok(self.store(environment).opt_in(subject_id).await?)
    }

    pub async fn opt_out(
        &self,
        subject_id: &str,
        environment: Environment,
    ) -> Result<bool, TrackerError> {
        Ok(self.store(environment).opt_out(subject_id).await?)
    }

    pub async fn set_opt(
        &self,
        subject_id: &str,
        value: bool,
        environment: Environment,
    ) -> Result<bool, TrackerError> {
        Ok(self.store(environment).set_opt(subject_id, value).await?)
    }

    pub async fn get_opt(
        &self,
        subject_id: &str,
        environment: Environment,
    ) -> Result<bool, TrackerError> {
        Ok(self.store(environment).get_opt(subject_id).await?)
    }
}
