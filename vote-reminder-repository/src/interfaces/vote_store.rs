//! This module defines the `VoteStore` trait, the interface to the durable
//! record of vote timestamps and reminder preferences of one environment.
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vote_reminder_shared::types::{OptPreference, VoteRecord};

use crate::errors::VoteStoreError;
use crate::types::ExpiredVotes;

/// A trait that defines the interface for interacting with a vote store.
///
/// A store owns two independent tables: vote records keyed by subject, and
/// opt preferences keyed by subject. Every data operation fails with
/// [`VoteStoreError::NotReady`] until [`VoteStore::init`] has completed.
///
/// All writes are upserts, so repeating an operation for the same subject
/// leaves the latest write in place.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Opens the underlying storage and creates both tables if absent.
    ///
    /// Calling it again on a ready store is a no-op. The store only becomes
    /// ready when the connection and both tables were set up successfully.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The store is ready
    /// * `Err(VoteStoreError::StorageConnection)` - The backend could not be opened
    /// * `Err(VoteStoreError::StorageQuery)` - Schema creation failed
    async fn init(&self) -> Result<(), VoteStoreError>;

    /// Releases the storage connection. Later operations fail with `NotReady`.
    async fn close(&self);

    /// Whether `init` has completed and the store has not been closed.
    fn is_ready(&self) -> bool;

    /// Age after which a vote record is handed to the reminder sweep.
    fn reminder_threshold(&self) -> Duration;

    /// Opt-in value for subjects without a stored preference.
    fn opt_in_default(&self) -> bool;

    /// Records a vote for `subject_id` stamped with the current time.
    async fn record_vote(&self, subject_id: &str) -> Result<(), VoteStoreError> {
        self.record_vote_at(subject_id, Utc::now()).await
    }

    /// Records a vote for `subject_id` at the given time, replacing any
    /// previous record of the subject.
    async fn record_vote_at(
        &self,
        subject_id: &str,
        voted_at: DateTime<Utc>,
    ) -> Result<(), VoteStoreError>;

    /// Deletes the vote record of `subject_id`. Absent records are a no-op.
    async fn remove_vote(&self, subject_id: &str) -> Result<(), VoteStoreError>;

    /// Point lookup of the vote record of `subject_id`.
    async fn get_vote(&self, subject_id: &str) -> Result<Option<VoteRecord>, VoteStoreError>;

    /// Every vote record whose `voted_at` is at or before `now - older_than`.
    ///
    /// The rows are selected when this call runs; the returned sequence
    /// yields one result per row so a bad row can be skipped without
    /// abandoning the rest.
    async fn list_expired_votes(
        &self,
        older_than: Duration,
    ) -> Result<ExpiredVotes, VoteStoreError>;

    /// Stores an explicit reminder preference and returns it.
    async fn set_opt(&self, subject_id: &str, value: bool) -> Result<bool, VoteStoreError>;

    /// Opts `subject_id` into reminders. Always returns `true`.
    async fn opt_in(&self, subject_id: &str) -> Result<bool, VoteStoreError> {
        self.set_opt(subject_id, true).await
    }

    /// Opts `subject_id` out of reminders. Always returns `false`.
    async fn opt_out(&self, subject_id: &str) -> Result<bool, VoteStoreError> {
        self.set_opt(subject_id, false).await
    }

    /// The stored preference of `subject_id`, if one was ever set.
    async fn get_opt_preference(
        &self,
        subject_id: &str,
    ) -> Result<Option<OptPreference>, VoteStoreError>;

    /// Whether `subject_id` wants reminders.
    ///
    /// Falls back to the store's configured default when no preference is
    /// stored; an unknown subject is never an error.
    async fn get_opt(&self, subject_id: &str) -> Result<bool, VoteStoreError> {
        let preference = self.get_opt_preference(subject_id).await?;
        Ok(preference
            .map(|preference| preference.opted_in)
            .unwrap_or_else(|| self.opt_in_default()))
    }
}
