//! Persistence error types.
//!
//! Errors carry a user-facing message and an optional remediation hint. A
//! failed save leaves the in-memory session untouched, so retrying is safe.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File system error around the database file.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database could not be opened.
    #[error("failed to open history database {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Creating or checking the schema failed.
    #[error("failed to prepare history schema")]
    Schema {
        #[source]
        source: rusqlite::Error,
    },

    /// The database was written by a newer schema.
    #[error("history schema version {found} is not supported (maximum: {max_supported})")]
    UnsupportedSchema { found: i64, max_supported: i64 },

    /// A statement failed.
    #[error("failed to {operation} pairing history")]
    Query {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored timestamp is malformed.
    #[error("invalid timestamp '{value}' in pairing history: {message}")]
    TimestampParse { value: String, message: String },

    /// Project names must not be blank.
    #[error("project name is empty")]
    EmptyProjectName,
}

impl PersistenceError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Query { operation, source }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} {}", operation, path.display()),
            Self::Open { path, .. } => {
                format!("Could not open the history database at {}", path.display())
            }
            Self::Schema { .. } => "The history database could not be prepared.".to_string(),
            Self::UnsupportedSchema {
                found,
                max_supported,
            } => format!(
                "The history database was written by a newer version \
                (schema {found}, this version supports up to {max_supported})."
            ),
            Self::Query { operation, .. } => {
                format!("Could not {operation} the pairing history. Nothing was lost in this session.")
            }
            Self::TimestampParse { value, .. } => {
                format!("The pairing history contains an unreadable timestamp: {value}")
            }
            Self::EmptyProjectName => "Enter a project name before saving.".to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { .. } | Self::Open { .. } => {
                Some("Check that the database directory exists and is writable.".into())
            }
            Self::UnsupportedSchema { .. } => {
                Some("Use a different --db path or upgrade the tool.".into())
            }
            Self::Query { .. } => Some("Retry the save; the session is still in memory.".into()),
            Self::Schema { .. } | Self::TimestampParse { .. } | Self::EmptyProjectName => None,
        }
    }
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = PersistenceError::UnsupportedSchema {
            found: 3,
            max_supported: 1,
        };
        assert!(err.user_message().contains("schema 3"));
        assert!(err.suggestion().is_some());
        assert!(PersistenceError::EmptyProjectName.suggestion().is_none());
    }
}
