//! SQLite implementation of the vote store.
mod schema;
mod vote_store;

pub use vote_store::SqliteVoteStore;
