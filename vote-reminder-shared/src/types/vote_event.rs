use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{Environment, SubjectId};

/// A validated inbound vote, as handed over by the webhook transport.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteEvent {
    pub subject_id: SubjectId,
    pub environment: Environment,
    /// The payload exactly as received; forwarded untouched on vote signals.
    pub raw: Value,
    /// When absent the store stamps the time of the write.
    pub voted_at: Option<DateTime<Utc>>,
}

impl VoteEvent {
    pub fn new(subject_id: impl Into<SubjectId>, environment: Environment, raw: Value) -> Self {
        Self {
            subject_id: subject_id.into(),
            environment,
            raw,
            voted_at: None,
        }
    }

    pub fn with_voted_at(mut self, voted_at: DateTime<Utc>) -> Self {
        self.voted_at = Some(voted_at);
        self
    }
}
