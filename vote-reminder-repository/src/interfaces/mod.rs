//! This module defines and re-exports the interfaces for the vote repository.
mod vote_store;

pub use vote_store::VoteStore;
