//! Row store for a single table
//!
//! Mutation order (strict):
//! 1. Primary key presence (insert only)
//! 2. Schema validation and coercion
//! 3. Constraint check
//! 4. Row commit and index update
//!
//! Steps 1-3 never mutate, so a failing insert leaves no trace. Batch
//! update and delete materialize their matching row ids once, before the
//! first mutation.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value as JsonValue;

use crate::errors::{DbError, DbResult};
use crate::index::{first_duplicate, IndexManager, RowId};
use crate::schema::{ColumnType, Columns, Row, SchemaValidator, ValidationMode};

use super::constraints::{check_primary_key, ConstraintEnforcer};
use super::predicate::Predicate;
use super::record::Record;

/// A typed table with its rows, indexes and constraints
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Columns,
    primary_key: Option<String>,
    rows: BTreeMap<RowId, Row>,
    next_row_id: RowId,
    unique: BTreeSet<String>,
    indexes: IndexManager,
}

impl Table {
    /// Creates an empty table. A declared primary key gets a unique index.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` if no columns are declared or the primary
    /// key names an undeclared column.
    pub fn new(name: impl Into<String>, columns: Columns, primary_key: Option<&str>) -> DbResult<Self> {
        let name = name.into();
        if columns.is_empty() {
            return Err(DbError::schema(format!(
                "table '{}' must declare at least one column",
                name
            )));
        }

        let mut table = Self {
            name,
            columns,
            primary_key: primary_key.map(str::to_string),
            rows: BTreeMap::new(),
            next_row_id: 1,
            unique: BTreeSet::new(),
            indexes: IndexManager::new(),
        };

        if let Some(pk) = primary_key {
            if !table.columns.contains_key(pk) {
                return Err(DbError::schema(format!(
                    "primary key '{}' is not a column of table '{}'",
                    pk, table.name
                )));
            }
            table.create_index(pk, true)?;
        }

        Ok(table)
    }

    /// Rebuilds a table from restored state.
    ///
    /// Every row is re-validated, then an index is built from the rows for
    /// each unique column and each requested index column. Unique columns
    /// are re-checked while their indexes are built.
    pub(crate) fn restore(
        name: impl Into<String>,
        columns: Columns,
        primary_key: Option<&str>,
        raw_rows: BTreeMap<RowId, JsonValue>,
        next_row_id: RowId,
        unique: &BTreeSet<String>,
        indexed: &BTreeSet<String>,
    ) -> DbResult<Self> {
        let mut table = Self::new(name, columns, primary_key)?;

        if let Some(max_id) = raw_rows.keys().next_back() {
            if next_row_id <= *max_id {
                return Err(DbError::schema(format!(
                    "next_row_id {} is not past the largest row id {}",
                    next_row_id, max_id
                )));
            }
        }
        if next_row_id == 0 {
            return Err(DbError::schema("next_row_id must be at least 1"));
        }

        let validator = SchemaValidator::new(&table.name, &table.columns);
        let mut rows = BTreeMap::new();
        for (row_id, raw) in &raw_rows {
            rows.insert(*row_id, validator.validate_and_coerce(raw, ValidationMode::Insert)?);
        }
        table.rows = rows;
        table.next_row_id = next_row_id;

        // The PK index was built on the empty table.
        table.indexes = IndexManager::new();
        table.unique.clear();
        let pk = table.primary_key.clone();
        for column in pk.iter().chain(unique.iter()) {
            if !table.indexes.is_indexed(column) {
                table.create_index(column, true)?;
            }
        }
        for column in indexed {
            if table.columns.contains_key(column) && !table.indexes.is_indexed(column) {
                table.create_index(column, false)?;
            }
        }

        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Declared kind of `column`
    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns.get(column).copied()
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Unique columns (always includes the primary key)
    pub fn unique_columns(&self) -> &BTreeSet<String> {
        &self.unique
    }

    pub fn indexed_columns(&self) -> impl Iterator<Item = &str> {
        self.indexes.indexed_columns()
    }

    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    pub fn next_row_id(&self) -> RowId {
        self.next_row_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stored row for `row_id`
    pub fn get(&self, row_id: RowId) -> Option<&Row> {
        self.rows.get(&row_id)
    }

    /// Rows in ascending row id order
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    /// Inserts a full payload and returns the new row id.
    ///
    /// # Errors
    ///
    /// - `DbError::Constraint` if the primary key is missing/null or a unique
    ///   value already exists
    /// - `DbError::Schema` if validation or coercion fails
    pub fn insert(&mut self, payload: &JsonValue) -> DbResult<RowId> {
        check_primary_key(self.primary_key.as_deref(), payload)?;

        let row = SchemaValidator::new(&self.name, &self.columns)
            .validate_and_coerce(payload, ValidationMode::Insert)?;

        ConstraintEnforcer::new(&self.unique, &self.indexes).check(&row, None)?;

        let row_id = self.next_row_id;
        self.indexes.update_index(row_id, Some(&row), None);
        self.rows.insert(row_id, row);
        self.next_row_id += 1;
        Ok(row_id)
    }

    /// Returns copies of all rows matching `predicate`.
    ///
    /// A single clause on an indexed column is answered from the index;
    /// everything else scans.
    pub fn select(&self, predicate: &Predicate) -> DbResult<Vec<Record>> {
        let ids = self.matching_ids(predicate)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| self.rows.get(&id).map(|row| Record::new(id, row.clone())))
            .collect())
    }

    /// Deletes all rows matching `predicate` and returns the count.
    pub fn delete(&mut self, predicate: &Predicate) -> DbResult<usize> {
        let ids = self.matching_ids(predicate)?;
        let mut count = 0;
        for id in ids {
            if let Some(row) = self.rows.remove(&id) {
                self.indexes.update_index(id, None, Some(&row));
                count += 1;
            }
        }
        Ok(count)
    }

    /// Applies `new_values` to all rows matching `predicate`.
    ///
    /// Each row is validated and checked before it is changed, but rows are
    /// committed one at a time: when a later row violates a constraint, the
    /// rows before it stay updated and the error is returned.
    pub fn update(&mut self, predicate: &Predicate, new_values: &JsonValue) -> DbResult<usize> {
        let ids = self.matching_ids(predicate)?;
        if ids.is_empty() {
            return Ok(0);
        }

        let changes = SchemaValidator::new(&self.name, &self.columns)
            .validate_and_coerce(new_values, ValidationMode::Update)?;

        let mut count = 0;
        for id in ids {
            let Some(current) = self.rows.get(&id) else {
                continue;
            };
            let mut merged = current.clone();
            merged.extend(changes.iter().map(|(k, v)| (k.clone(), v.clone())));

            ConstraintEnforcer::new(&self.unique, &self.indexes).check(&merged, Some(id))?;

            self.indexes.update_index(id, Some(&merged), Some(current));
            self.rows.insert(id, merged);
            count += 1;
        }
        Ok(count)
    }

    /// Creates an index on `column`, optionally enforcing uniqueness.
    ///
    /// # Errors
    ///
    /// - `DbError::Schema` if the column is undeclared or already indexed
    /// - `DbError::Constraint` if `unique` and existing rows hold a
    ///   duplicate; no index is created in that case
    pub fn create_index(&mut self, column: &str, unique: bool) -> DbResult<()> {
        if !self.columns.contains_key(column) {
            return Err(DbError::schema(format!(
                "column '{}' does not exist in table '{}'",
                column, self.name
            )));
        }
        if self.indexes.is_indexed(column) {
            return Err(DbError::schema(format!(
                "index on column '{}' already exists",
                column
            )));
        }
        if unique {
            if let Some(dup) = first_duplicate(column, self.rows.values()) {
                return Err(DbError::constraint(format!(
                    "cannot create unique index on '{}': duplicate value {} found",
                    column, dup
                )));
            }
        }

        self.indexes
            .create_index(column, self.rows.iter().map(|(id, row)| (*id, row)));
        if unique {
            self.unique.insert(column.to_string());
        }
        Ok(())
    }

    /// Row ids matching `predicate`, ascending.
    fn matching_ids(&self, predicate: &Predicate) -> DbResult<Vec<RowId>> {
        for clause in predicate.clauses() {
            if !self.columns.contains_key(&clause.column) {
                return Err(DbError::schema(format!(
                    "unknown column '{}' in predicate for table '{}'",
                    clause.column, self.name
                )));
            }
        }
        let predicate = predicate.map_values(|c| c.value.normalized_for(self.columns[&c.column]));

        if let [clause] = predicate.clauses() {
            if let Some(ids) = self.indexes.lookup(&clause.column, &clause.value) {
                return Ok(ids);
            }
        }

        Ok(self
            .rows
            .iter()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(id, _)| *id)
            .collect())
    }
}
