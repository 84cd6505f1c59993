//! Database configuration
//!
//! Read from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "snapshot_path": "data/tabledb.snapshot.json",
//!   "pretty_snapshot": true,
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{DbError, DbResult};
use crate::observability::Severity;

/// Default snapshot file, relative to the working directory
pub const DEFAULT_SNAPSHOT_PATH: &str = "tabledb.snapshot.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Snapshot file (default: "tabledb.snapshot.json")
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Pretty-print snapshot JSON (default: false)
    #[serde(default)]
    pub pretty_snapshot: bool,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_snapshot_path() -> String {
    DEFAULT_SNAPSHOT_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            pretty_snapshot: false,
            log_level: default_log_level(),
        }
    }
}

impl DatabaseConfig {
    /// Config with the given snapshot path and defaults elsewhere
    pub fn with_snapshot_path(path: impl Into<String>) -> Self {
        Self {
            snapshot_path: path.into(),
            ..Default::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> DbResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DbError::config(format!("failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> DbResult<Self> {
        let config: DatabaseConfig = serde_json::from_str(content)
            .map_err(|e| DbError::config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> DbResult<()> {
        if self.snapshot_path.trim().is_empty() {
            return Err(DbError::config("snapshot_path must not be empty"));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> DbResult<Severity> {
        self.log_level.parse().map_err(DbError::config)
    }

    pub fn snapshot_path(&self) -> &Path {
        Path::new(&self.snapshot_path)
    }
}
