use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SubjectId;

/// The most recent recorded vote of a subject.
///
/// There is at most one record per subject per store; a new vote overwrites
/// `voted_at`. Serialized with the field names the host application sees on
/// `reminder` signals (`id`, `votedAt` in Unix milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    #[serde(rename = "id")]
    pub subject_id: SubjectId,
    #[serde(rename = "votedAt", with = "chrono::serde::ts_milliseconds")]
    pub voted_at: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(subject_id: impl Into<SubjectId>, voted_at: DateTime<Utc>) -> Self {
        Self {
            subject_id: subject_id.into(),
            voted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_host_field_names() {
        let voted_at = DateTime::from_timestamp_millis(1_713_859_200_123).unwrap();
        let record = VoteRecord::new("140862798832861184", voted_at);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "140862798832861184");
        assert_eq!(json["votedAt"], 1_713_859_200_123i64);
    }
}
