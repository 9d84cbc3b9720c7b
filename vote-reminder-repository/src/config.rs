//! Configuration types for a vote store.

use std::time::Duration;

/// Location value that selects an ephemeral, in-memory database.
pub const MEMORY_LOCATION: &str = ":memory:";

/// Default location of the production database.
pub const DEFAULT_LOCATION: &str = "./voters.db";

/// Default production reminder threshold (12 hours).
pub const DEFAULT_REMINDER_THRESHOLD_SECS: u64 = 43_200;

/// Default reminder threshold of the test store.
pub const DEFAULT_TEST_REMINDER_THRESHOLD_SECS: u64 = 30;

/// Configuration carried by a store from construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file path, or [`MEMORY_LOCATION`] for an in-memory database.
    pub location: String,
    /// Age after which a vote is considered expired.
    pub reminder_threshold: Duration,
    /// Opt-in value for subjects without a stored preference.
    pub opt_in_default: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            reminder_threshold: Duration::from_secs(DEFAULT_REMINDER_THRESHOLD_SECS),
            opt_in_default: false,
        }
    }
}

impl StoreConfig {
    /// Defaults for the store receiving test events.
    pub fn test_default() -> Self {
        Self {
            location: MEMORY_LOCATION.to_string(),
            reminder_threshold: Duration::from_secs(DEFAULT_TEST_REMINDER_THRESHOLD_SECS),
            opt_in_default: false,
        }
    }

    /// An in-memory store with the given threshold.
    pub fn in_memory(reminder_threshold: Duration) -> Self {
        Self {
            location: MEMORY_LOCATION.to_string(),
            reminder_threshold,
            opt_in_default: false,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_reminder_threshold(mut self, reminder_threshold: Duration) -> Self {
        self.reminder_threshold = reminder_threshold;
        self
    }

    pub fn with_opt_in_default(mut self, opt_in_default: bool) -> Self {
        self.opt_in_default = opt_in_default;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location.is_empty() || self.location == MEMORY_LOCATION
    }
}
