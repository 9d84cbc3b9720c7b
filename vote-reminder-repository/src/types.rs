//! Types returned by vote store operations.

use std::fmt;

use vote_reminder_shared::types::VoteRecord;

use crate::errors::VoteStoreError;

/// Expired vote records, one typed result per row.
///
/// The set of rows is fixed when the store answers the query; the sequence
/// only decodes them as it is consumed. A failed row does not end the
/// sequence, so callers can skip it and keep going.
pub struct ExpiredVotes {
    rows: Box<dyn Iterator<Item = Result<VoteRecord, VoteStoreError>> + Send>,
}

impl ExpiredVotes {
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Result<VoteRecord, VoteStoreError>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            rows: Box::new(rows.into_iter()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for ExpiredVotes {
    type Item = Result<VoteRecord, VoteStoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl fmt::Debug for ExpiredVotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiredVotes").finish_non_exhaustive()
    }
}
