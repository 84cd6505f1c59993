//! Core error types for tabledb
//!
//! Error codes:
//! - TDB_SCHEMA_VIOLATION (REJECT)
//! - TDB_CONSTRAINT_VIOLATION (REJECT)
//! - TDB_TABLE_NOT_FOUND (REJECT)
//! - TDB_CONFIG_INVALID (REJECT)
//! - TDB_SNAPSHOT_* (see `snapshot::SnapshotErrorCode`)
//!
//! Every core operation returns `DbResult`. An error aborts the operation
//! that raised it; mutations already committed by that call stay committed.

use std::fmt;

use thiserror::Error;

use crate::snapshot::SnapshotError;

/// Severity levels for core errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, database state is consistent
    Reject,
    /// Database state could not be established
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Core error taxonomy
#[derive(Debug, Error)]
pub enum DbError {
    /// Structural problem: unknown/missing column, failed coercion,
    /// duplicate table name, undeclared join key, illegal index request
    #[error("schema error: {0}")]
    Schema(String),

    /// Semantic violation: null/duplicate primary key, duplicate unique value
    #[error("constraint error: {0}")]
    Constraint(String),

    /// Reference to a table that does not exist
    #[error("not found: table '{0}' does not exist")]
    NotFound(String),

    /// Unreadable or invalid configuration file
    #[error("config error: {0}")]
    Config(String),

    /// Snapshot save/load failure
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl DbError {
    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a constraint error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a table-not-found error
    pub fn not_found(table: impl Into<String>) -> Self {
        Self::NotFound(table.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Schema(_) => "TDB_SCHEMA_VIOLATION",
            Self::Constraint(_) => "TDB_CONSTRAINT_VIOLATION",
            Self::NotFound(_) => "TDB_TABLE_NOT_FOUND",
            Self::Config(_) => "TDB_CONFIG_INVALID",
            Self::Snapshot(e) => e.code().code(),
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            Self::Snapshot(e) if e.is_fatal() => Severity::Fatal,
            _ => Severity::Reject,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for core operations
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DbError::schema("x").code(), "TDB_SCHEMA_VIOLATION");
        assert_eq!(DbError::constraint("x").code(), "TDB_CONSTRAINT_VIOLATION");
        assert_eq!(DbError::not_found("t").code(), "TDB_TABLE_NOT_FOUND");
        assert_eq!(DbError::config("x").code(), "TDB_CONFIG_INVALID");
    }

    #[test]
    fn test_core_errors_are_rejects() {
        assert_eq!(DbError::schema("x").severity(), Severity::Reject);
        assert_eq!(DbError::constraint("x").severity(), Severity::Reject);
    }

    #[test]
    fn test_corrupt_snapshot_is_fatal() {
        let err = DbError::from(SnapshotError::corrupt("bad checksum"));
        assert_eq!(err.severity(), Severity::Fatal);
        assert_eq!(err.code(), "TDB_SNAPSHOT_CORRUPT");
    }

    #[test]
    fn test_display_names_table() {
        let display = DbError::not_found("orders").to_string();
        assert!(display.contains("orders"));
    }
}
