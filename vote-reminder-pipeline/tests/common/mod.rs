//! In-memory `VoteStore` with failure injection, shared by the integration
//! tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;
use vote_reminder_repository::{ExpiredVotes, VoteStore, VoteStoreError};
use vote_reminder_shared::types::{OptPreference, VoteRecord};

pub struct MockVoteStore {
    threshold: Duration,
    opt_in_default: bool,
    ready: AtomicBool,
    votes: Mutex<HashMap<String, DateTime<Utc>>>,
    opts: Mutex<HashMap<String, bool>>,
    corrupt_rows: Mutex<HashSet<String>>,
    failing_opt_reads: Mutex<HashSet<String>>,
    failing_removals: Mutex<HashSet<String>>,
    sweeps: AtomicUsize,
    sweep_delays: Mutex<VecDeque<Duration>>,
    sweep_starts: Mutex<Vec<Instant>>,
    active_sweeps: AtomicUsize,
    max_active_sweeps: AtomicUsize,
}

impl MockVoteStore {
    pub fn new(threshold: Duration, opt_in_default: bool) -> Self {
        Self {
            threshold,
            opt_in_default,
            ready: AtomicBool::new(true),
            votes: Mutex::new(HashMap::new()),
            opts: Mutex::new(HashMap::new()),
            corrupt_rows: Mutex::new(HashSet::new()),
            failing_opt_reads: Mutex::new(HashSet::new()),
            failing_removals: Mutex::new(HashSet::new()),
            sweeps: AtomicUsize::new(0),
            sweep_delays: Mutex::new(VecDeque::new()),
            sweep_starts: Mutex::new(Vec::new()),
            active_sweeps: AtomicUsize::new(0),
            max_active_sweeps: AtomicUsize::new(0),
        }
    }

    pub fn insert_vote(&self, subject_id: &str, voted_at: DateTime<Utc>) {
        self.votes
            .lock()
            .unwrap()
            .insert(subject_id.to_string(), voted_at);
    }

    pub fn has_vote(&self, subject_id: &str) -> bool {
        self.votes.lock().unwrap().contains_key(subject_id)
    }

    pub fn corrupt_row(&self, subject_id: &str) {
        self.corrupt_rows.lock().unwrap().insert(subject_id.to_string());
    }

    pub fn repair_row(&self, subject_id: &str) {
        self.corrupt_rows.lock().unwrap().remove(subject_id);
    }

    pub fn fail_opt_read(&self, subject_id: &str) {
        self.failing_opt_reads
            .lock()
            .unwrap()
            .insert(subject_id.to_string());
    }

    pub fn fail_removal(&self, subject_id: &str) {
        self.failing_removals
            .lock()
            .unwrap()
            .insert(subject_id.to_string());
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.load(Ordering::SeqCst)
    }

    /// Makes each of the next `count` expiry queries take `delay`.
    pub fn slow_down_sweeps(&self, count: usize, delay: Duration) {
        self.sweep_delays
            .lock()
            .unwrap()
            .extend(std::iter::repeat(delay).take(count));
    }

    /// Tokio time at which each expiry query started.
    pub fn sweep_starts(&self) -> Vec<Instant> {
        self.sweep_starts.lock().unwrap().clone()
    }

    /// Highest number of expiry queries that were in flight at once.
    pub fn max_concurrent_sweeps(&self) -> usize {
        self.max_active_sweeps.load(Ordering::SeqCst)
    }

    fn check_ready(&self) -> Result<(), VoteStoreError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(VoteStoreError::NotReady)
        }
    }
}

#[async_trait]
impl VoteStore for MockVoteStore {
    async fn init(&self) -> Result<(), VoteStoreError> {
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn reminder_threshold(&self) -> Duration {
        self.threshold
    }

    fn opt_in_default(&self) -> bool {
        self.opt_in_default
    }

    async fn record_vote_at(
        &self,
        subject_id: &str,
        voted_at: DateTime<Utc>,
    ) -> Result<(), VoteStoreError> {
        self.check_ready()?;
        self.insert_vote(subject_id, voted_at);
        Ok(())
    }

    async fn remove_vote(&self, subject_id: &str) -> Result<(), VoteStoreError> {
        self.check_ready()?;
        if self.failing_removals.lock().unwrap().contains(subject_id) {
            return Err(VoteStoreError::StorageQuery(sqlx::Error::PoolTimedOut));
        }
        self.votes.lock().unwrap().remove(subject_id);
        Ok(())
    }

    async fn get_vote(&self, subject_id: &str) -> Result<Option<VoteRecord>, VoteStoreError> {
        self.check_ready()?;
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(subject_id)
            .map(|voted_at| VoteRecord::new(subject_id, *voted_at)))
    }

    async fn list_expired_votes(
        &self,
        older_than: Duration,
    ) -> Result<ExpiredVotes, VoteStoreError> {
        self.check_ready()?;
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        self.sweep_starts.lock().unwrap().push(Instant::now());

        let active = self.active_sweeps.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_sweeps.fetch_max(active, Ordering::SeqCst);
        let delay = self.sweep_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.active_sweeps.fetch_sub(1, Ordering::SeqCst);

        let cutoff = Utc::now() - chrono::Duration::from_std(older_than).unwrap();
        let corrupt = self.corrupt_rows.lock().unwrap().clone();
        let mut expired: Vec<(String, DateTime<Utc>)> = self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, voted_at)| **voted_at <= cutoff)
            .map(|(id, voted_at)| (id.clone(), *voted_at))
            .collect();
        expired.sort_by_key(|(_, voted_at)| *voted_at);

        let rows: Vec<_> = expired
            .into_iter()
            .map(|(id, voted_at)| {
                if corrupt.contains(&id) {
                    Err(VoteStoreError::InvalidTimestamp(-1))
                } else {
                    Ok(VoteRecord::new(id, voted_at))
                }
            })
            .collect();
        Ok(ExpiredVotes::new(rows))
    }

    async fn set_opt(&self, subject_id: &str, value: bool) -> Result<bool, VoteStoreError> {
        self.check_ready()?;
        self.opts
            .lock()
            .unwrap()
            .insert(subject_id.to_string(), value);
        Ok(value)
    }

    async fn get_opt_preference(
        &self,
        subject_id: &str,
    ) -> Result<Option<OptPreference>, VoteStoreError> {
        self.check_ready()?;
        if self.failing_opt_reads.lock().unwrap().contains(subject_id) {
            return Err(VoteStoreError::StorageQuery(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .opts
            .lock()
            .unwrap()
            .get(subject_id)
            .map(|opted_in| OptPreference {
                subject_id: subject_id.to_string(),
                opted_in: *opted_in,
            }))
    }
}
