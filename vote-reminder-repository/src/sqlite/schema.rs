//! Table definitions shared with databases written by earlier versions of
//! the service: `votedAt` holds Unix milliseconds, `optIn` holds 0/1.

pub(crate) const CREATE_VOTERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS voters (
    id TEXT NOT NULL PRIMARY KEY,
    votedAt TIMESTAMP
)
"#;

pub(crate) const CREATE_VOTER_OPTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS voterOptions (
    id TEXT NOT NULL PRIMARY KEY,
    optIn BOOLEAN
)
"#;
