//! Snapshot persistence for tabledb
//!
//! A snapshot is a single JSON file holding every table: schema, primary
//! key, unique set, indexed column names, rows keyed by row id and the
//! row-id counter. Indexes themselves are never stored; they are rebuilt
//! from rows on load.
//!
//! Loading is strict. A snapshot that exists but fails to parse, fails its
//! checksum, or holds rows that no longer satisfy their schema is reported
//! as `TDB_SNAPSHOT_CORRUPT` and nothing is restored.

mod checksum;
mod codec;
mod errors;
mod manifest;

pub use checksum::{compute_checksum, format_checksum, parse_checksum};
pub use codec::{LoadedSnapshot, SnapshotCodec, SnapshotStats};
pub use errors::{Severity, SnapshotError, SnapshotErrorCode, SnapshotResult};
pub use manifest::{SnapshotManifest, TableSnapshot, FORMAT_VERSION};
