//! Error types for quickpoll.
//!
//! This module defines all error types used throughout the quickpoll crate,
//! along with the mapping from an error to the one-line message a user sees.

use std::path::PathBuf;
use thiserror::Error;

use crate::form::FormErrors;

/// Message shown whenever the poll server cannot be reached.
pub const CONNECT_MESSAGE: &str = "Could not connect to server.";

/// The main error type for quickpoll operations.
#[derive(Error, Debug)]
pub enum Error {
    // === API Errors ===
    /// The server could not be reached (refused, DNS, timeout).
    #[error("could not connect to server at {url}: {source}")]
    Connect {
        /// The URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `error` (or legacy `message`) field of the response body, if any.
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        /// The endpoint that produced the body.
        endpoint: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // === Poll Errors ===
    /// A poll link contained characters outside the URL-safe alphabet.
    #[error("invalid poll link: '{link}'")]
    InvalidLink {
        /// The rejected link.
        link: String,
    },

    /// An option id or choice number does not belong to the poll.
    #[error("option {option} is not part of this poll")]
    InvalidOption {
        /// The rejected option id or choice number.
        option: i64,
    },

    /// The poll creation form has validation errors.
    #[error("invalid poll: {0}")]
    Validation(FormErrors),

    /// No option was selected before voting.
    #[error("Please select an option")]
    NoSelection,

    /// The ledger already holds a vote for this poll.
    #[error("You have already voted on this poll")]
    AlreadyVoted {
        /// Link of the poll that was already voted on.
        link: String,
    },

    // === Ledger Errors ===
    /// Failed to open or create the vote ledger.
    #[error("failed to open vote ledger at {path}: {source}")]
    LedgerOpen {
        /// Path to the ledger file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A ledger query failed.
    #[error("vote ledger query failed: {0}")]
    LedgerQuery(#[from] rusqlite::Error),

    /// Failed to run ledger migrations.
    #[error("vote ledger migration failed: {message}")]
    LedgerMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for quickpoll operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the server was unreachable.
    #[must_use]
    pub fn is_connect_error(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// The HTTP status of a server-side failure, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message a view displays for this error.
    ///
    /// Server error payloads surface their message, connectivity failures get
    /// [`CONNECT_MESSAGE`], and everything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Connect { .. } => CONNECT_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 404,
            message: Some("Poll not found".to_string()),
        };
        assert_eq!(err.to_string(), "server returned 404: Poll not found");

        let err = Error::Api {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "server returned 502: no error message");
    }

    #[test]
    fn test_user_message_surfaces_server_error() {
        let err = Error::Api {
            status: 400,
            message: Some("Invalid option for this poll".to_string()),
        };
        assert_eq!(
            err.user_message("Failed to submit vote. Please try again."),
            "Invalid option for this poll"
        );
    }

    #[test]
    fn test_user_message_falls_back_without_payload() {
        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to load poll"), "Failed to load poll");

        let err = Error::internal("boom");
        assert_eq!(err.user_message("Failed to load poll"), "Failed to load poll");
    }

    #[test]
    fn test_status() {
        let err = Error::Api {
            status: 401,
            message: None,
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(Error::NoSelection.status(), None);
    }

    #[test]
    fn test_selection_errors_display() {
        assert_eq!(Error::NoSelection.to_string(), "Please select an option");
        let err = Error::AlreadyVoted {
            link: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "You have already voted on this poll");
    }

    #[test]
    fn test_invalid_link_display() {
        let err = Error::InvalidLink {
            link: "../etc".to_string(),
        };
        assert!(err.to_string().contains("../etc"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert!(!err.is_connect_error());
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/ledger.db",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::LedgerQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "refresh_interval_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_ledger_migration_error_display() {
        let err = Error::LedgerMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }
}
