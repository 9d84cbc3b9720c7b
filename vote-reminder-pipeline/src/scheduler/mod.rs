//! This module defines the `ReminderScheduler`, the recurring sweep that turns
//! expired votes into reminder signals.
//!
//! One scheduler runs per store. A sweep is executed inline in the scheduler
//! loop, so two sweeps of the same store never overlap; ticks that elapse
//! while a sweep is still running are skipped.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, instrument, warn};
use vote_reminder_repository::{VoteStore, VoteStoreError};
use vote_reminder_shared::types::{Environment, Signal, VoteRecord};

use crate::signals::SignalBus;

/// Default period between two sweeps of a store.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(10_000);

/// Configuration for a reminder scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time between the start of two consecutive sweeps.
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Outcome of a single sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Rows returned by the expiry query, including failed ones.
    pub expired: usize,
    /// Reminder signals emitted.
    pub reminded: usize,
    /// Vote records deleted.
    pub removed: usize,
    /// Rows that could not be processed. Unless the failure happened while
    /// deleting, the record stays in the store for the next sweep.
    pub failed: usize,
}

/// Periodically finds expired votes in one store, emits a reminder for
/// opted-in subjects and purges every processed record.
pub struct ReminderScheduler {
    environment: Environment,
    store: Arc<dyn VoteStore>,
    signals: SignalBus,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    pub fn new(
        environment: Environment,
        store: Arc<dyn VoteStore>,
        signals: SignalBus,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            environment,
            store,
            signals,
            config,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Runs one sweep over the store.
    ///
    /// Rows are handled independently and in the order the store returned
    /// them. A row that fails to decode, or whose preference cannot be read,
    /// is reported and left in place.
    ///
    /// # Returns
    ///
    /// * `Ok(SweepReport)` - The sweep ran; per-row failures are counted in the report
    /// * `Err(VoteStoreError)` - The expiry query itself failed
    #[instrument(skip(self), fields(environment = %self.environment))]
    pub async fn sweep(&self) -> Result<SweepReport, VoteStoreError> {
        let threshold = self.store.reminder_threshold();
        let expired = self.store.list_expired_votes(threshold).await?;

        let mut report = SweepReport::default();
        for row in expired {
            report.expired += 1;
            match row {
                Ok(record) => self.process_record(record, &mut report).await,
                Err(e) => {
                    report.failed += 1;
                    warn!(error = %e, "Skipping unreadable vote record");
                }
            }
        }

        if report.expired > 0 {
            debug!(
                expired = report.expired,
                reminded = report.reminded,
                removed = report.removed,
                failed = report.failed,
                "Sweep finished"
            );
        }
        Ok(report)
    }

    async fn process_record(&self, record: VoteRecord, report: &mut SweepReport) {
        let opted_in = match self.store.get_opt(&record.subject_id).await {
            Ok(opted_in) => opted_in,
            Err(e) => {
                report.failed += 1;
                warn!(
                    subject_id = %record.subject_id,
                    error = %e,
                    "Failed to read reminder preference, retrying next sweep"
                );
                return;
            }
        };

        let subject_id = record.subject_id.clone();
        if opted_in {
            self.signals.emit(Signal::reminder(self.environment, record));
            report.reminded += 1;
        }

        match self.store.remove_vote(&subject_id).await {
            Ok(()) => report.removed += 1,
            Err(e) => {
                report.failed += 1;
                error!(
                    subject_id = %subject_id,
                    error = %e,
                    "Failed to remove processed vote record"
                );
            }
        }
    }

    /// Sweeps the store every configured interval until `shutdown` fires.
    ///
    /// The first sweep happens one interval after the call. A sweep in
    /// progress when shutdown is requested runs to completion.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        // interval_at panics on a zero period.
        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            environment = %self.environment,
            interval_ms = period.as_millis() as u64,
            threshold_secs = self.store.reminder_threshold().as_secs(),
            "Reminder scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep().await {
                        error!(environment = %self.environment, error = %e, "Reminder sweep failed");
                    }
                }
                _ = shutdown.recv() => {
                    break;
                }
            }
        }

        info!(environment = %self.environment, "Reminder scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use vote_reminder_repository::{SqliteVoteStore, StoreConfig};

    async fn scheduler_with_store(
        environment: Environment,
        opt_in_default: bool,
    ) -> (ReminderScheduler, Arc<dyn VoteStore>, SignalBus) {
        let store: Arc<dyn VoteStore> = Arc::new(SqliteVoteStore::new(
            StoreConfig::in_memory(Duration::from_secs(30)).with_opt_in_default(opt_in_default),
        ));
        store.init().await.unwrap();
        let signals = SignalBus::default();
        let scheduler = ReminderScheduler::new(
            environment,
            Arc::clone(&store),
            signals.clone(),
            SchedulerConfig::default(),
        );
        (scheduler, store, signals)
    }

    #[tokio::test]
    async fn test_sweep_without_expired_votes_is_empty() {
        let (scheduler, store, _) = scheduler_with_store(Environment::Production, true).await;
        store.record_vote("fresh").await.unwrap();

        let report = scheduler.sweep().await.unwrap();

        assert_eq!(report, SweepReport::default());
        assert!(store.get_vote("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_emits_reminder_for_default_opt_in() {
        let (scheduler, store, signals) = scheduler_with_store(Environment::Production, true).await;
        let mut receiver = signals.subscribe();
        let voted_at = Utc::now() - ChronoDuration::seconds(31);
        store.record_vote_at("u1", voted_at).await.unwrap();

        let report = scheduler.sweep().await.unwrap();

        assert_eq!(report.reminded, 1);
        assert_eq!(report.removed, 1);
        match receiver.try_recv().unwrap() {
            Signal::Reminder(record) => {
                assert_eq!(record.subject_id, "u1");
                assert_eq!(record.voted_at.timestamp_millis(), voted_at.timestamp_millis());
            }
            other => panic!("Expected reminder, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_test_environment_emits_test_reminder() {
        let (scheduler, store, signals) = scheduler_with_store(Environment::Test, false).await;
        let mut receiver = signals.subscribe();
        store.opt_in("u1").await.unwrap();
        store
            .record_vote_at("u1", Utc::now() - ChronoDuration::minutes(1))
            .await
            .unwrap();

        scheduler.sweep().await.unwrap();

        assert_eq!(receiver.try_recv().unwrap().name(), "testReminder");
    }

    #[tokio::test]
    async fn test_opted_out_record_is_removed_silently() {
        let (scheduler, store, signals) = scheduler_with_store(Environment::Production, true).await;
        let mut receiver = signals.subscribe();
        store.opt_out("u1").await.unwrap();
        store
            .record_vote_at("u1", Utc::now() - ChronoDuration::minutes(1))
            .await
            .unwrap();

        let report = scheduler.sweep().await.unwrap();

        assert_eq!(report.reminded, 0);
        assert_eq!(report.removed, 1);
        assert!(receiver.try_recv().is_err());
        assert!(store.get_vote("u1").await.unwrap().is_none());
        // The preference itself is kept.
        assert!(!store.get_opt("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_fails_on_closed_store() {
        let (scheduler, store, _) = scheduler_with_store(Environment::Production, false).await;
        store.close().await;

        let result = scheduler.sweep().await;

        assert!(matches!(result, Err(VoteStoreError::NotReady)));
    }
}
