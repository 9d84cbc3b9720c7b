//! # Vote Reminder Repository
//! This crate provides the storage layer of the vote reminder service: the
//! `VoteStore` trait, its configuration and error types, and a concrete
//! implementation backed by SQLite.
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod sqlite;
pub mod types;

pub use config::StoreConfig;
pub use errors::VoteStoreError;
pub use interfaces::VoteStore;
pub use sqlite::SqliteVoteStore;
pub use types::ExpiredVotes;
