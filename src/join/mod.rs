//! Equality join engine
//!
//! Nested-loop inner join. For each left row (ascending row id) the right
//! table is probed by index when the right key is indexed, otherwise by a
//! full scan. Output rows carry the left columns as-is and the right columns
//! prefixed with `<right_table>_`.

use crate::errors::{DbError, DbResult};
use crate::index::RowId;
use crate::schema::{Row, Value};
use crate::table::Table;

/// How the right side was probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// One bucket lookup per left row
    IndexLookup,
    /// One right-table scan per left row
    NestedScan,
}

/// Joins two tables on `left.left_key == right.right_key`
pub struct JoinEngine<'a> {
    left: &'a Table,
    right: &'a Table,
    left_key: &'a str,
    right_key: &'a str,
}

impl<'a> JoinEngine<'a> {
    /// Prepares a join, checking both keys are declared.
    pub fn new(left: &'a Table, right: &'a Table, left_key: &'a str, right_key: &'a str) -> DbResult<Self> {
        if left.column_type(left_key).is_none() {
            return Err(DbError::schema(format!(
                "column '{}' not found in table '{}'",
                left_key,
                left.name()
            )));
        }
        if right.column_type(right_key).is_none() {
            return Err(DbError::schema(format!(
                "column '{}' not found in table '{}'",
                right_key,
                right.name()
            )));
        }
        Ok(Self {
            left,
            right,
            left_key,
            right_key,
        })
    }

    pub fn strategy(&self) -> ProbeStrategy {
        if self.right.indexes().is_indexed(self.right_key) {
            ProbeStrategy::IndexLookup
        } else {
            ProbeStrategy::NestedScan
        }
    }

    /// Runs the join and returns merged rows.
    pub fn execute(&self) -> Vec<Row> {
        let right_kind = self.right.column_type(self.right_key);
        let mut results = Vec::new();

        for (_, left_row) in self.left.rows() {
            let Some(left_value) = left_row.get(self.left_key) else {
                continue;
            };
            let probe = match right_kind {
                Some(kind) => left_value.normalized_for(kind),
                None => left_value.clone(),
            };
            for right_id in self.matches(&probe) {
                if let Some(right_row) = self.right.get(right_id) {
                    results.push(self.merge(left_row, right_row));
                }
            }
        }

        results
    }

    fn matches(&self, probe: &Value) -> Vec<RowId> {
        match self.right.indexes().lookup(self.right_key, probe) {
            Some(ids) => ids,
            None => self
                .right
                .rows()
                .filter(|(_, row)| row.get(self.right_key) == Some(probe))
                .map(|(id, _)| id)
                .collect(),
        }
    }

    fn merge(&self, left_row: &Row, right_row: &Row) -> Row {
        let mut merged = left_row.clone();
        let prefix = self.right.name();
        for (column, value) in right_row {
            merged.insert(format!("{}_{}", prefix, column), value.clone());
        }
        merged
    }
}

/// Convenience wrapper: validate keys and execute
pub fn join(left: &Table, right: &Table, left_key: &str, right_key: &str) -> DbResult<Vec<Row>> {
    Ok(JoinEngine::new(left, right, left_key, right_key)?.execute())
}
