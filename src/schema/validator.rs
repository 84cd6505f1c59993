//! Payload validation and coercion against column declarations
//!
//! Validation order:
//! 1. Unknown columns are rejected
//! 2. On insert, every declared column must be present
//! 3. Null is rejected in every column
//! 4. Each value is coerced to its declared kind
//!
//! The output row holds only canonical typed values; it is what the table
//! stores.

use serde_json::{Map, Value as JsonValue};

use crate::errors::{DbError, DbResult};

use super::types::{Columns, Row};
use super::value::{coerce, json_kind};

/// Whether the payload must cover all declared columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Full payload: all declared columns required
    Insert,
    /// Partial payload: any subset of declared columns
    Update,
}

/// Validates payloads for a single table.
///
/// The validator borrows the table's declarations and never mutates them.
pub struct SchemaValidator<'a> {
    table: &'a str,
    columns: &'a Columns,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for the named table's declarations.
    pub fn new(table: &'a str, columns: &'a Columns) -> Self {
        Self { table, columns }
    }

    /// Validates a raw JSON payload, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` if the payload is not an object, names an
    /// undeclared column, misses a column (insert), holds a null, or holds a
    /// value that cannot be coerced to the declared kind.
    pub fn validate_and_coerce(&self, payload: &JsonValue, mode: ValidationMode) -> DbResult<Row> {
        match payload {
            JsonValue::Object(map) => self.validate_map(map, mode),
            other => Err(DbError::schema(format!(
                "payload for table '{}' must be an object, got {}",
                self.table,
                json_kind(other)
            ))),
        }
    }

    /// Validates an already-destructured JSON object.
    pub fn validate_map(&self, payload: &Map<String, JsonValue>, mode: ValidationMode) -> DbResult<Row> {
        if let Some(unknown) = payload.keys().find(|k| !self.columns.contains_key(*k)) {
            return Err(DbError::schema(format!(
                "unknown column '{}' in table '{}'",
                unknown, self.table
            )));
        }

        if mode == ValidationMode::Insert {
            let missing: Vec<&str> = self
                .columns
                .keys()
                .filter(|c| !payload.contains_key(*c))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(DbError::schema(format!(
                    "missing columns in table '{}': {}",
                    self.table,
                    missing.join(", ")
                )));
            }
        }

        let mut row = Row::new();
        for (column, raw) in payload {
            let kind = self.columns[column];
            if raw.is_null() {
                return Err(DbError::schema(format!(
                    "column '{}' cannot be null",
                    column
                )));
            }
            let value = coerce(raw, kind).ok_or_else(|| {
                DbError::schema(format!(
                    "column '{}' expects {}, got {} ({})",
                    column,
                    kind,
                    json_kind(raw),
                    raw
                ))
            })?;
            row.insert(column.clone(), value);
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, Value};
    use crate::schema::types::columns;
    use serde_json::json;

    fn user_columns() -> Columns {
        columns([
            ("id", ColumnType::Int),
            ("name", ColumnType::Str),
            ("score", ColumnType::Float),
            ("active", ColumnType::Bool),
        ])
    }

    #[test]
    fn test_valid_insert_coerces() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let row = validator
            .validate_and_coerce(
                &json!({"id": "5", "name": 12, "score": 3, "active": "TRUE"}),
                ValidationMode::Insert,
            )
            .unwrap();

        assert_eq!(row["id"], Value::Int(5));
        assert_eq!(row["name"], Value::from("12"));
        assert_eq!(row["score"], Value::Float(3.0));
        assert_eq!(row["active"], Value::Bool(true));
    }

    #[test]
    fn test_unknown_column_rejected_first() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let err = validator
            .validate_and_coerce(&json!({"nickname": "x"}), ValidationMode::Insert)
            .unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("unknown column"));
    }

    #[test]
    fn test_missing_columns_listed() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let err = validator
            .validate_and_coerce(&json!({"id": 1, "name": "a"}), ValidationMode::Insert)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing columns"));
        assert!(msg.contains("active"));
        assert!(msg.contains("score"));
    }

    #[test]
    fn test_update_allows_partial() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let row = validator
            .validate_and_coerce(&json!({"score": "1.25"}), ValidationMode::Update)
            .unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row["score"], Value::Float(1.25));
    }

    #[test]
    fn test_null_rejected_in_any_column() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let err = validator
            .validate_and_coerce(&json!({"name": null}), ValidationMode::Update)
            .unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("cannot be null"));
    }

    #[test]
    fn test_coercion_failure_names_column_and_kind() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let err = validator
            .validate_and_coerce(&json!({"id": "abc"}), ValidationMode::Update)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'id'"));
        assert!(msg.contains("int"));
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let cols = user_columns();
        let validator = SchemaValidator::new("users", &cols);
        let err = validator
            .validate_and_coerce(&json!([1, 2]), ValidationMode::Insert)
            .unwrap_err();
        assert!(err.is_schema());
    }
}
