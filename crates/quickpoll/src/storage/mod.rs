//! Local vote ledger.
//!
//! Remembers which option this client picked on each poll so the vote view
//! can disable voting and restore the selection. This is a convenience for
//! the user, not a guarantee: the server is the only authority on votes.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::PollLink;

/// A vote this client has cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteRecord {
    /// Link of the poll voted on.
    pub poll_link: PollLink,
    /// The chosen option.
    pub option_id: i64,
    /// Poll question at voting time, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// When the vote was recorded locally. `None` if the stored timestamp is
    /// unreadable.
    pub voted_at: Option<DateTime<Utc>>,
}

/// Persistent poll-link to option mapping backed by `SQLite`.
#[derive(Debug)]
pub struct VoteLedger {
    path: PathBuf,
    conn: Connection,
}

impl VoteLedger {
    /// Open or create a ledger at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening vote ledger at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::LedgerOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Vote ledger ready at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory ledger for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::LedgerOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a vote, replacing any earlier record for the same poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn record(&self, link: &PollLink, option_id: i64, question: Option<&str>) -> Result<()> {
        let voted_at = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT OR REPLACE INTO votes (poll_link, option_id, question, voted_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![link.as_str(), option_id, question, voted_at],
        )?;
        debug!("Recorded vote for {} (option {})", link, option_id);
        Ok(())
    }

    /// Get the recorded vote for a poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, link: &PollLink) -> Result<Option<VoteRecord>> {
        let record = self
            .conn
            .query_row(
                r"
                SELECT poll_link, option_id, question, voted_at
                FROM votes WHERE poll_link = ?1
                ",
                [link.as_str()],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record.flatten())
    }

    /// Whether this client has voted on the poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn has_voted(&self, link: &PollLink) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM votes WHERE poll_link = ?1",
            [link.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All recorded votes, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<VoteRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT poll_link, option_id, question, voted_at
            FROM votes ORDER BY voted_at DESC, poll_link ASC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records.into_iter().flatten().collect())
    }

    /// Forget the vote for one poll.
    ///
    /// Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn forget(&self, link: &PollLink) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM votes WHERE poll_link = ?1", [link.as_str()])?;
        Ok(affected > 0)
    }

    /// Forget every recorded vote. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM votes", [])?;
        if affected > 0 {
            info!("Cleared {} recorded votes", affected);
        }
        Ok(affected)
    }

    /// Count recorded votes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM votes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Rows with a link that no longer parses are skipped with a warning.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Option<VoteRecord>> {
        let link: String = row.get(0)?;
        let option_id: i64 = row.get(1)?;
        let question: Option<String> = row.get(2)?;
        let voted_at_str: String = row.get(3)?;

        let Ok(poll_link) = PollLink::parse(&link) else {
            warn!("Skipping ledger row with invalid poll link: {}", link);
            return Ok(None);
        };

        let voted_at = match DateTime::parse_from_rfc3339(&voted_at_str) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                warn!(
                    "Ledger row for {} has unreadable timestamp '{}': {}",
                    poll_link, voted_at_str, e
                );
                None
            }
        };

        Ok(Some(VoteRecord {
            poll_link,
            option_id,
            question,
            voted_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_ledger() -> VoteLedger {
        VoteLedger::open_in_memory().expect("failed to create test ledger")
    }

    fn link(s: &str) -> PollLink {
        PollLink::parse(s).unwrap()
    }

    #[test]
    fn test_record_and_get() {
        let ledger = create_test_ledger();
        ledger.record(&link("abc"), 7, Some("Lunch?")).unwrap();

        let record = ledger.get(&link("abc")).unwrap().unwrap();
        assert_eq!(record.option_id, 7);
        assert_eq!(record.question.as_deref(), Some("Lunch?"));
        assert!(ledger.has_voted(&link("abc")).unwrap());
    }

    #[test]
    fn test_get_unknown_poll() {
        let ledger = create_test_ledger();
        assert!(ledger.get(&link("nothing")).unwrap().is_none());
        assert!(!ledger.has_voted(&link("nothing")).unwrap());
    }

    #[test]
    fn test_record_replaces_previous_choice() {
        let ledger = create_test_ledger();
        ledger.record(&link("abc"), 1, None).unwrap();
        ledger.record(&link("abc"), 2, None).unwrap();

        assert_eq!(ledger.count().unwrap(), 1);
        assert_eq!(ledger.get(&link("abc")).unwrap().unwrap().option_id, 2);
    }

    #[test]
    fn test_list_and_count() {
        let ledger = create_test_ledger();
        ledger.record(&link("one"), 1, None).unwrap();
        ledger.record(&link("two"), 2, None).unwrap();

        assert_eq!(ledger.count().unwrap(), 2);
        let records = ledger.list().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_forget() {
        let ledger = create_test_ledger();
        ledger.record(&link("abc"), 1, None).unwrap();

        assert!(ledger.forget(&link("abc")).unwrap());
        assert!(!ledger.forget(&link("abc")).unwrap());
        assert!(!ledger.has_voted(&link("abc")).unwrap());
    }

    #[test]
    fn test_clear() {
        let ledger = create_test_ledger();
        ledger.record(&link("a"), 1, None).unwrap();
        ledger.record(&link("b"), 1, None).unwrap();

        assert_eq!(ledger.clear().unwrap(), 2);
        assert_eq!(ledger.count().unwrap(), 0);
        assert_eq!(ledger.clear().unwrap(), 0);
    }

    #[test]
    fn test_invalid_rows_skipped() {
        let ledger = create_test_ledger();
        ledger.record(&link("good"), 1, None).unwrap();
        ledger
            .conn
            .execute(
                "INSERT INTO votes (poll_link, option_id, voted_at) VALUES ('bad link', 2, 'x')",
                [],
            )
            .unwrap();

        let records = ledger.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].poll_link.as_str(), "good");
    }

    #[test]
    fn test_unreadable_timestamp_kept_without_time() {
        let ledger = create_test_ledger();
        ledger
            .conn
            .execute(
                "INSERT INTO votes (poll_link, option_id, voted_at) VALUES ('old', 4, 'yesterday')",
                [],
            )
            .unwrap();

        let record = ledger.get(&link("old")).unwrap().unwrap();
        assert_eq!(record.option_id, 4);
        assert_eq!(record.voted_at, None);
        assert!(ledger.has_voted(&link("old")).unwrap());
    }

    #[test]
    fn test_path_in_memory() {
        let ledger = create_test_ledger();
        assert_eq!(ledger.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = std::env::temp_dir();
        let nested = temp_dir.join(format!("quickpoll_ledger_test_{}", std::process::id()));
        let db_path = nested.join("sub").join("votes.db");
        let _ = std::fs::remove_dir_all(&nested);

        {
            let ledger = VoteLedger::open(&db_path).unwrap();
            ledger.record(&link("persist"), 9, Some("Kept?")).unwrap();
            assert_eq!(ledger.path(), db_path);
        }

        let reopened = VoteLedger::open(&db_path).unwrap();
        let record = reopened.get(&link("persist")).unwrap().unwrap();
        assert_eq!(record.option_id, 9);

        drop(reopened);
        let _ = std::fs::remove_dir_all(&nested);
    }
}
