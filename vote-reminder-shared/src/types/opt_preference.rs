use serde::{Deserialize, Serialize};

use crate::types::SubjectId;

/// A subject's explicit choice to receive reminders or not.
///
/// Preferences are independent from vote records: they are never created by
/// voting and never removed by a reminder sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptPreference {
    #[serde(rename = "id")]
    pub subject_id: SubjectId,
    #[serde(rename = "optIn")]
    pub opted_in: bool,
}
