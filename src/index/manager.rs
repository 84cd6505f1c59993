//! Index Manager for tabledb
//!
//! Maintains per-column hash indexes: value -> set of row ids.
//!
//! # API
//!
//! - `create_index(column, rows)` - Build an index over current rows
//! - `update_index(row_id, new, old)` - The single mutation path for buckets
//! - `rebuild(rows)` - Clear and repopulate every index
//! - `lookup(column, value)` - Exact match lookup

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::schema::{Row, Value};

/// Synthetic row identifier
pub type RowId = u64;

/// A single column's index
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    buckets: HashMap<Value, BTreeSet<RowId>>,
}

impl ColumnIndex {
    fn add(&mut self, value: &Value, row_id: RowId) {
        self.buckets.entry(value.clone()).or_default().insert(row_id);
    }

    fn remove(&mut self, value: &Value, row_id: RowId) {
        if let Some(bucket) = self.buckets.get_mut(value) {
            bucket.remove(&row_id);
            if bucket.is_empty() {
                self.buckets.remove(value);
            }
        }
    }

    /// Row ids holding `value`, in ascending order
    pub fn get(&self, value: &Value) -> Option<&BTreeSet<RowId>> {
        self.buckets.get(value)
    }

    /// Number of distinct values present
    pub fn distinct_values(&self) -> usize {
        self.buckets.len()
    }

    /// Iterates every `(value, row ids)` bucket
    pub fn buckets(&self) -> impl Iterator<Item = (&Value, &BTreeSet<RowId>)> {
        self.buckets.iter()
    }
}

/// Index Manager holding every index of one table
#[derive(Debug, Clone, Default)]
pub struct IndexManager {
    indexes: BTreeMap<String, ColumnIndex>,
}

impl IndexManager {
    /// Creates a manager with no indexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `column` is indexed
    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexes.contains_key(column)
    }

    /// Indexed column names in order
    pub fn indexed_columns(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    /// Returns the index for `column`, if any
    pub fn index(&self, column: &str) -> Option<&ColumnIndex> {
        self.indexes.get(column)
    }

    /// Exact match lookup.
    ///
    /// Returns `None` if the column is not indexed, and an empty list if the
    /// column is indexed but no row holds `value`.
    pub fn lookup(&self, column: &str, value: &Value) -> Option<Vec<RowId>> {
        let index = self.indexes.get(column)?;
        Some(
            index
                .get(value)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
        )
    }

    /// Creates an index on `column` populated from `rows`.
    ///
    /// Returns false (and changes nothing) if the column is already indexed.
    /// Uniqueness pre-checks are the caller's responsibility.
    pub fn create_index<'r, I>(&mut self, column: &str, rows: I) -> bool
    where
        I: IntoIterator<Item = (RowId, &'r Row)>,
    {
        if self.indexes.contains_key(column) {
            return false;
        }
        let mut index = ColumnIndex::default();
        for (row_id, row) in rows {
            if let Some(value) = row.get(column) {
                index.add(value, row_id);
            }
        }
        self.indexes.insert(column.to_string(), index);
        true
    }

    /// Moves `row_id` from its `old` values to its `new` values.
    ///
    /// Insert passes no `old`, delete passes no `new`, update passes both.
    /// Emptied buckets are dropped.
    pub fn update_index(&mut self, row_id: RowId, new: Option<&Row>, old: Option<&Row>) {
        for (column, index) in self.indexes.iter_mut() {
            if let Some(value) = old.and_then(|o| o.get(column)) {
                index.remove(value, row_id);
            }
            if let Some(value) = new.and_then(|n| n.get(column)) {
                index.add(value, row_id);
            }
        }
    }

    /// Clears every index and repopulates it from `rows`.
    pub fn rebuild<'r, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (RowId, &'r Row)>,
    {
        for index in self.indexes.values_mut() {
            index.buckets.clear();
        }
        for (row_id, row) in rows {
            self.update_index(row_id, Some(row), None);
        }
    }
}

/// Returns the first value of `column` that appears in more than one row.
pub fn first_duplicate<'r, I>(column: &str, rows: I) -> Option<Value>
where
    I: IntoIterator<Item = &'r Row>,
{
    let mut seen = std::collections::HashSet::new();
    rows.into_iter()
        .filter_map(|row| row.get(column))
        .find(|value| !seen.insert(*value))
        .cloned()
}
