//! Constraint enforcement: primary key presence and uniqueness
//!
//! Uniqueness is checked against the unique columns' indexes. Every unique
//! column is indexed, so a check is one bucket lookup per column.

use std::collections::BTreeSet;

use serde_json::Value as JsonValue;

use crate::errors::{DbError, DbResult};
use crate::index::{IndexManager, RowId};
use crate::schema::Row;

/// Checks unique constraints for one table
pub struct ConstraintEnforcer<'a> {
    unique: &'a BTreeSet<String>,
    indexes: &'a IndexManager,
}

impl<'a> ConstraintEnforcer<'a> {
    pub fn new(unique: &'a BTreeSet<String>, indexes: &'a IndexManager) -> Self {
        Self { unique, indexes }
    }

    /// Fails if any unique column in `values` already holds that value in a
    /// row other than `ignore_row_id`.
    pub fn check(&self, values: &Row, ignore_row_id: Option<RowId>) -> DbResult<()> {
        for column in self.unique {
            let Some(value) = values.get(column) else {
                continue;
            };
            let Some(holders) = self.indexes.index(column).and_then(|i| i.get(value)) else {
                continue;
            };
            if holders.iter().any(|id| Some(*id) != ignore_row_id) {
                return Err(DbError::constraint(format!(
                    "duplicate entry: {}={} already exists",
                    column, value
                )));
            }
        }
        Ok(())
    }
}

/// Rejects an insert payload whose primary key is missing or null.
///
/// Runs before schema validation. Non-object payloads are left for the
/// validator to reject.
pub fn check_primary_key(primary_key: Option<&str>, payload: &JsonValue) -> DbResult<()> {
    let (Some(pk), JsonValue::Object(map)) = (primary_key, payload) else {
        return Ok(());
    };
    match map.get(pk) {
        None | Some(JsonValue::Null) => Err(DbError::constraint(format!(
            "primary key '{}' cannot be null",
            pk
        ))),
        Some(_) => Ok(()),
    }
}
