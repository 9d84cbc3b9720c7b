//! Error types for the vote reminder repository.
mod vote_store;

pub use vote_store::VoteStoreError;
