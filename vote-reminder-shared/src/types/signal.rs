use serde_json::Value;

use crate::types::{Environment, VoteRecord};

/// Notifications delivered to the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A production vote was observed. Carries the inbound payload unchanged.
    Vote(Value),
    /// A test vote was observed. Carries the inbound payload unchanged.
    TestVote(Value),
    /// A production vote expired and the subject is opted in.
    Reminder(VoteRecord),
    /// A test vote expired and the subject is opted in.
    TestReminder(VoteRecord),
}

impl Signal {
    pub fn vote(environment: Environment, payload: Value) -> Self {
        match environment {
            Environment::Production => Signal::Vote(payload),
            Environment::Test => Signal::TestVote(payload),
        }
    }

    pub fn reminder(environment: Environment, record: VoteRecord) -> Self {
        match environment {
            Environment::Production => Signal::Reminder(record),
            Environment::Test => Signal::TestReminder(record),
        }
    }

    /// Event name under which the host application subscribes to this signal.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Vote(_) => "vote",
            Signal::TestVote(_) => "testVote",
            Signal::Reminder(_) => "reminder",
            Signal::TestReminder(_) => "testReminder",
        }
    }

    pub fn environment(&self) -> Environment {
        match self {
            Signal::Vote(_) | Signal::Reminder(_) => Environment::Production,
            Signal::TestVote(_) | Signal::TestReminder(_) => Environment::Test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_vote_signal_follows_environment() {
        let payload = json!({ "user": "42", "type": "test" });

        let signal = Signal::vote(Environment::Test, payload.clone());
        assert_eq!(signal, Signal::TestVote(payload));
        assert_eq!(signal.name(), "testVote");
        assert_eq!(signal.environment(), Environment::Test);
    }

    #[test]
    fn test_reminder_signal_names() {
        let record = VoteRecord::new("42", Utc::now());

        assert_eq!(Signal::reminder(Environment::Production, record.clone()).name(), "reminder");
        assert_eq!(Signal::reminder(Environment::Test, record).name(), "testReminder");
    }
}
