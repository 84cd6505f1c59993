//! Snapshot error types
//!
//! Error codes:
//! - TDB_SNAPSHOT_IO (ERROR severity)
//! - TDB_SNAPSHOT_ENCODE (ERROR severity)
//! - TDB_SNAPSHOT_CORRUPT (FATAL severity)

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Severity levels for snapshot errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, in-memory state is untouched
    Error,
    /// Snapshot content cannot be trusted; the database cannot be opened
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Snapshot-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotErrorCode {
    /// Reading or writing the snapshot file failed
    TdbSnapshotIo,
    /// Serializing the database failed
    TdbSnapshotEncode,
    /// Snapshot exists but cannot be parsed or restored
    TdbSnapshotCorrupt,
}

impl SnapshotErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotErrorCode::TdbSnapshotIo => "TDB_SNAPSHOT_IO",
            SnapshotErrorCode::TdbSnapshotEncode => "TDB_SNAPSHOT_ENCODE",
            SnapshotErrorCode::TdbSnapshotCorrupt => "TDB_SNAPSHOT_CORRUPT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SnapshotErrorCode::TdbSnapshotCorrupt => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for SnapshotErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Snapshot error with context
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("[ERROR] TDB_SNAPSHOT_IO: {message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("[ERROR] TDB_SNAPSHOT_ENCODE: {message}")]
    Encode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("[FATAL] TDB_SNAPSHOT_CORRUPT: {message}")]
    Corrupt { message: String },
}

impl SnapshotError {
    /// Create an I/O error with path context
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self::Io {
            message: format!("I/O error at path: {}", path.display()),
            source,
        }
    }

    /// Create an encode error
    pub fn encode(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            message: message.into(),
            source,
        }
    }

    /// Create a corrupt snapshot error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SnapshotErrorCode {
        match self {
            Self::Io { .. } => SnapshotErrorCode::TdbSnapshotIo,
            Self::Encode { .. } => SnapshotErrorCode::TdbSnapshotEncode,
            Self::Corrupt { .. } => SnapshotErrorCode::TdbSnapshotCorrupt,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns the error message without code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Io { message, .. } | Self::Encode { message, .. } | Self::Corrupt { message } => {
                message
            }
        }
    }

    /// Returns whether the snapshot content is unusable
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;
