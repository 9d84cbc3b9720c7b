//! Error types for the vote tracker.
use thiserror::Error;
use vote_reminder_repository::VoteStoreError;

/// Represents errors that can occur while starting or querying the tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Vote store error: {0}")]
    Store(#[from] VoteStoreError),

    #[error("Reminder schedulers are already running")]
    AlreadyRunning,
}
