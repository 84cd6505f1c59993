//! Schema Coercion Tests
//!
//! Tests for validation and coercion through the table API:
//! - Unknown, missing and null columns are rejected
//! - Values are stored in their declared kind
//! - Failed coercion names the column and both kinds
//! - Validation happens before any mutation

use serde_json::json;
use tabledb::schema::{columns, ColumnType, SchemaValidator, ValidationMode};
use tabledb::{Predicate, Table, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn readings() -> Table {
    Table::new(
        "readings",
        columns([
            ("id", ColumnType::Int),
            ("label", ColumnType::Str),
            ("value", ColumnType::Float),
            ("ok", ColumnType::Bool),
        ]),
        Some("id"),
    )
    .unwrap()
}

fn stored(t: &Table, id: i64) -> tabledb::Row {
    t.select(&Predicate::eq("id", id))
        .unwrap()
        .remove(0)
        .into_values()
}

// =============================================================================
// Coercion Tests
// =============================================================================

/// Strings, whole floats and ints are coerced to their declared kinds.
#[test]
fn test_values_stored_as_declared_kind() {
    let mut t = readings();
    t.insert(&json!({"id": "7", "label": 42, "value": 3, "ok": "TRUE"}))
        .unwrap();
    t.insert(&json!({"id": 8.0, "label": true, "value": " 2.5 ", "ok": false}))
        .unwrap();

    let first = stored(&t, 7);
    assert_eq!(first["id"], Value::Int(7));
    assert_eq!(first["label"], Value::from("42"));
    assert_eq!(first["value"], Value::float(3.0));
    assert_eq!(first["ok"], Value::Bool(true));

    let second = stored(&t, 8);
    assert_eq!(second["label"], Value::from("true"));
    assert_eq!(second["value"], Value::float(2.5));
}

/// Fractional floats, garbage strings and containers are rejected.
#[test]
fn test_uncoercible_values_rejected() {
    let mut t = readings();
    for payload in [
        json!({"id": 1.5, "label": "a", "value": 1, "ok": true}),
        json!({"id": 1, "label": "a", "value": "fast", "ok": true}),
        json!({"id": 1, "label": "a", "value": 1, "ok": "yes"}),
        json!({"id": 1, "label": ["a"], "value": 1, "ok": true}),
        json!({"id": 1, "label": "a", "value": {"v": 1}, "ok": true}),
        json!({"id": 1, "label": "a", "value": 1, "ok": 1}),
    ] {
        let err = t.insert(&payload).unwrap_err();
        assert!(err.is_schema(), "expected schema error for {}", payload);
    }
    assert!(t.is_empty());
    assert_eq!(t.next_row_id(), 1);
}

/// Coercion errors name the column, the expected kind and the actual kind.
#[test]
fn test_coercion_error_message() {
    let mut t = readings();
    let err = t
        .insert(&json!({"id": 1, "label": "a", "value": "fast", "ok": true}))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("value"));
    assert!(msg.contains("float"));
    assert!(msg.contains("string"));
}

// =============================================================================
// Shape Tests
// =============================================================================

/// Unknown columns are rejected on insert and update.
#[test]
fn test_unknown_column_rejected() {
    let mut t = readings();
    let err = t
        .insert(&json!({"id": 1, "label": "a", "value": 1, "ok": true, "extra": 0}))
        .unwrap_err();
    assert!(err.to_string().contains("unknown column 'extra'"));
}

/// Missing columns are listed together in one error.
#[test]
fn test_missing_columns_listed() {
    let mut t = readings();
    let msg = t.insert(&json!({"id": 1})).unwrap_err().to_string();
    assert!(msg.contains("label"));
    assert!(msg.contains("ok"));
    assert!(msg.contains("value"));
}

/// Null is never a valid value.
#[test]
fn test_null_rejected() {
    let mut t = readings();
    let err = t
        .insert(&json!({"id": 1, "label": null, "value": 1, "ok": true}))
        .unwrap_err();
    assert!(err.is_schema());
    assert!(err.to_string().contains("cannot be null"));
}

/// Non-object payloads are schema errors.
#[test]
fn test_payload_must_be_object() {
    let mut t = Table::new("t", columns([("a", ColumnType::Int)]), None).unwrap();
    assert!(t.insert(&json!([1])).unwrap_err().is_schema());
}

// =============================================================================
// Validator Tests
// =============================================================================

/// Update mode accepts partial payloads; insert mode does not.
#[test]
fn test_update_mode_allows_partial() {
    let cols = columns([("a", ColumnType::Int), ("b", ColumnType::Str)]);
    let validator = SchemaValidator::new("t", &cols);

    let row = validator
        .validate_and_coerce(&json!({"a": "5"}), ValidationMode::Update)
        .unwrap();
    assert_eq!(row.len(), 1);
    assert_eq!(row["a"], Value::Int(5));

    assert!(validator
        .validate_and_coerce(&json!({"a": 5}), ValidationMode::Insert)
        .is_err());
}

/// Validation is deterministic.
#[test]
fn test_validation_is_deterministic() {
    let cols = columns([("a", ColumnType::Float)]);
    let validator = SchemaValidator::new("t", &cols);
    let first = validator
        .validate_and_coerce(&json!({"a": "1e3"}), ValidationMode::Insert)
        .unwrap();
    for _ in 0..50 {
        let again = validator
            .validate_and_coerce(&json!({"a": "1e3"}), ValidationMode::Insert)
            .unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(first["a"], Value::float(1000.0));
}
