//! Snapshot file structure
//!
//! Format:
//! ```json
//! {
//!   "format_version": 1,
//!   "created_at": "2026-10-14T09:30:00Z",
//!   "checksum": "crc32:0a1b2c3d",
//!   "tables": {
//!     "users": {
//!       "columns": {"id": "int", "name": "str"},
//!       "pk": "id",
//!       "rows": {"1": {"id": 1, "name": "Alice"}},
//!       "next_row_id": 2,
//!       "unique": ["id"],
//!       "indexes": ["id"]
//!     }
//!   }
//! }
//! ```
//!
//! `tables` is kept as raw JSON so the checksum covers its exact bytes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value as JsonValue;

use crate::errors::DbResult;
use crate::index::RowId;
use crate::schema::Columns;
use crate::table::{row_to_json, Table};

/// Current snapshot format version
pub const FORMAT_VERSION: u8 = 1;

/// Top-level snapshot file
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// Snapshot format version (always 1)
    pub format_version: u8,

    /// Creation timestamp in RFC3339 format (YYYY-MM-DDTHH:MM:SSZ)
    pub created_at: String,

    /// CRC32 of the raw `tables` bytes (format: "crc32:XXXXXXXX")
    pub checksum: String,

    /// Table name -> `TableSnapshot`, unparsed
    pub tables: Box<RawValue>,
}

/// Persisted state of one table.
///
/// Index contents are never stored; `indexes` only names the columns to
/// re-index on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub columns: Columns,
    pub pk: Option<String>,
    pub rows: BTreeMap<RowId, JsonValue>,
    pub next_row_id: RowId,
    pub unique: BTreeSet<String>,
    #[serde(default)]
    pub indexes: BTreeSet<String>,
}

impl TableSnapshot {
    /// Captures a table's persistent state
    pub fn capture(table: &Table) -> Self {
        Self {
            columns: table.columns().clone(),
            pk: table.primary_key().map(str::to_string),
            rows: table.rows().map(|(id, row)| (id, row_to_json(row))).collect(),
            next_row_id: table.next_row_id(),
            unique: table.unique_columns().clone(),
            indexes: table.indexed_columns().map(str::to_string).collect(),
        }
    }

    /// Rebuilds the table, re-validating rows and rebuilding every index.
    pub fn restore(self, name: &str) -> DbResult<Table> {
        Table::restore(
            name,
            self.columns,
            self.pk.as_deref(),
            self.rows,
            self.next_row_id,
            &self.unique,
            &self.indexes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{columns, ColumnType};
    use serde_json::json;

    fn sample() -> Table {
        let mut t = Table::new(
            "users",
            columns([("id", ColumnType::Int), ("email", ColumnType::Str)]),
            Some("id"),
        )
        .unwrap();
        t.create_index("email", true).unwrap();
        t.insert(&json!({"id": 1, "email": "a@x"})).unwrap();
        t
    }

    #[test]
    fn test_capture_layout() {
        let snap = TableSnapshot::capture(&sample());
        let json = serde_json::to_value(&snap).unwrap();

        assert_eq!(json["pk"], "id");
        assert_eq!(json["next_row_id"], 2);
        assert_eq!(json["rows"]["1"]["email"], "a@x");
        assert_eq!(json["columns"]["id"], "int");
        assert_eq!(json["unique"], json!(["email", "id"]));
        assert_eq!(json["indexes"], json!(["email", "id"]));
    }

    #[test]
    fn test_restore_from_parsed_json() {
        let raw = json!({
            "columns": {"id": "int", "email": "str"},
            "pk": "id",
            "rows": {"3": {"id": 7, "email": "c@x"}},
            "next_row_id": 4,
            "unique": ["id", "email"]
        });
        let snap: TableSnapshot = serde_json::from_value(raw).unwrap();
        let table = snap.restore("users").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.next_row_id(), 4);
        assert!(table.indexes().is_indexed("email"));
    }

    #[test]
    fn test_restore_rejects_counter_behind_rows() {
        let mut snap = TableSnapshot::capture(&sample());
        snap.next_row_id = 1;
        assert!(snap.restore("users").is_err());
    }
}
