use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two independent stores an event or query targets.
///
/// Production and test events never share state: each environment owns its
/// own store, scheduler and signal pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn is_test(self) -> bool {
        matches!(self, Environment::Test)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
