//! Error types for vote store operations.
use thiserror::Error;

/// Represents errors that can occur within a vote store.
///
/// `StorageConnection` is only produced while initializing a store and is
/// fatal to startup. `StorageQuery` and `InvalidTimestamp` are scoped to the
/// single call or row that produced them.
#[derive(Debug, Error)]
pub enum VoteStoreError {
    #[error("Vote store is not initialized")]
    NotReady,

    #[error("Storage connection error: {0}")]
    StorageConnection(#[source] sqlx::Error),

    #[error("Storage query error: {0}")]
    StorageQuery(#[from] sqlx::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl VoteStoreError {
    /// Whether the error came from a store that has not been initialized yet.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, VoteStoreError::NotReady)
    }
}
