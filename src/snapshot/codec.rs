//! Whole-database snapshot encode/decode
//!
//! Save sequence:
//! 1. Capture every table
//! 2. Serialize the table map and checksum its bytes
//! 3. Wrap in the manifest and write the file wholesale, then fsync
//!
//! The write is not atomic: a crash mid-write leaves a file that fails
//! its checksum or does not parse, which load reports as corruption.
//!
//! Load sequence:
//! 1. Missing file -> nothing to restore
//! 2. Parse manifest, check format version and checksum
//! 3. Parse each table and restore it (rows re-validated, indexes rebuilt)

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use serde_json::value::RawValue;

use crate::table::Table;

use super::checksum::{compute_checksum, format_checksum, parse_checksum};
use super::errors::{SnapshotError, SnapshotResult};
use super::manifest::{SnapshotManifest, TableSnapshot, FORMAT_VERSION};

/// Summary of a written snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStats {
    pub tables: usize,
    pub rows: usize,
    pub bytes: usize,
    pub checksum: String,
}

/// A decoded snapshot
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub created_at: String,
    pub checksum: String,
    pub tables: BTreeMap<String, Table>,
}

impl LoadedSnapshot {
    pub fn row_count(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }
}

/// Snapshot encoder/decoder
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Encodes all tables into snapshot bytes.
    pub fn encode(tables: &BTreeMap<String, Table>, pretty: bool) -> SnapshotResult<Vec<u8>> {
        let captured: BTreeMap<&str, TableSnapshot> = tables
            .iter()
            .map(|(name, table)| (name.as_str(), TableSnapshot::capture(table)))
            .collect();

        let body = if pretty {
            serde_json::to_string_pretty(&captured)
        } else {
            serde_json::to_string(&captured)
        }
        .map_err(|e| SnapshotError::encode("failed to serialize tables", e))?;

        let checksum = format_checksum(compute_checksum(body.as_bytes()));
        let raw = RawValue::from_string(body)
            .map_err(|e| SnapshotError::encode("serialized tables are not valid JSON", e))?;

        let manifest = SnapshotManifest {
            format_version: FORMAT_VERSION,
            created_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            checksum,
            tables: raw,
        };

        if pretty {
            serde_json::to_vec_pretty(&manifest)
        } else {
            serde_json::to_vec(&manifest)
        }
        .map_err(|e| SnapshotError::encode("failed to serialize snapshot manifest", e))
    }

    /// Decodes snapshot bytes into restored tables.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Corrupt` on parse failure, unsupported
    /// format version, checksum mismatch, or invalid restored content.
    pub fn decode(bytes: &[u8]) -> SnapshotResult<LoadedSnapshot> {
        let manifest: SnapshotManifest = serde_json::from_slice(bytes)
            .map_err(|e| SnapshotError::corrupt(format!("snapshot does not parse: {}", e)))?;

        if manifest.format_version != FORMAT_VERSION {
            return Err(SnapshotError::corrupt(format!(
                "unsupported snapshot format version {}",
                manifest.format_version
            )));
        }

        let expected = parse_checksum(&manifest.checksum).ok_or_else(|| {
            SnapshotError::corrupt(format!("malformed checksum '{}'", manifest.checksum))
        })?;
        let body = manifest.tables.get();
        let actual = compute_checksum(body.as_bytes());
        if actual != expected {
            return Err(SnapshotError::corrupt(format!(
                "checksum mismatch: expected {}, found {}",
                manifest.checksum,
                format_checksum(actual)
            )));
        }

        let snapshots: BTreeMap<String, TableSnapshot> = serde_json::from_str(body)
            .map_err(|e| SnapshotError::corrupt(format!("table data does not parse: {}", e)))?;

        let mut tables = BTreeMap::new();
        for (name, snapshot) in snapshots {
            let table = snapshot.restore(&name).map_err(|e| {
                SnapshotError::corrupt(format!("table '{}' cannot be restored: {}", name, e))
            })?;
            tables.insert(name, table);
        }

        Ok(LoadedSnapshot {
            created_at: manifest.created_at,
            checksum: manifest.checksum,
            tables,
        })
    }

    /// Writes a snapshot of `tables` to `path`, replacing any existing file.
    pub fn write(path: &Path, tables: &BTreeMap<String, Table>, pretty: bool) -> SnapshotResult<SnapshotStats> {
        let bytes = Self::encode(tables, pretty)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::io_error_at_path(parent, e))?;
        }

        let mut file = File::create(path).map_err(|e| SnapshotError::io_error_at_path(path, e))?;
        file.write_all(&bytes)
            .map_err(|e| SnapshotError::io_error_at_path(path, e))?;
        file.sync_all()
            .map_err(|e| SnapshotError::io_error_at_path(path, e))?;

        let manifest: SnapshotManifest = serde_json::from_slice(&bytes)
            .map_err(|e| SnapshotError::encode("written snapshot does not parse", e))?;

        Ok(SnapshotStats {
            tables: tables.len(),
            rows: tables.values().map(Table::len).sum(),
            bytes: bytes.len(),
            checksum: manifest.checksum,
        })
    }

    /// Reads and decodes the snapshot at `path`.
    ///
    /// Returns `Ok(None)` if no snapshot file exists.
    pub fn read(path: &Path) -> SnapshotResult<Option<LoadedSnapshot>> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::io_error_at_path(path, e)),
        };
        Self::decode(&bytes).map(Some)
    }
}
