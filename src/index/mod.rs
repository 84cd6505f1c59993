//! Index Manager subsystem for tabledb
//!
//! Indexes are derived, in-memory-only state. They are never persisted; a
//! snapshot load rebuilds them from restored rows.
//!
//! # Invariants
//!
//! - Buckets exactly mirror the live rows of the indexed column
//! - No empty buckets are retained
//! - Lookups return row ids in ascending order
//! - All bucket mutation goes through `IndexManager::update_index`

mod manager;

pub use manager::{first_duplicate, ColumnIndex, IndexManager, RowId};
