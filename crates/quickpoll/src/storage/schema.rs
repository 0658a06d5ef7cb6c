//! `SQLite` schema definitions for the vote ledger.
//!
//! This module contains the SQL statements for creating the base schema.
//! Later columns are added by migrations.

/// SQL statement to create the votes table.
///
/// One row per poll link: the client believes it voted once per poll.
pub const CREATE_VOTES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS votes (
    poll_link TEXT PRIMARY KEY NOT NULL,
    option_id INTEGER NOT NULL,
    voted_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `voted_at` for listing.
pub const CREATE_VOTED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_votes_voted_at ON votes(voted_at DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_VOTES_TABLE,
    CREATE_VOTED_AT_INDEX,
    CREATE_METADATA_TABLE,
];
