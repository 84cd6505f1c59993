//! Conjunctive equality predicates
//!
//! A predicate is the AND of `column = value` clauses. No ranges, no
//! expressions. The empty predicate matches every row.

use serde_json::Value as JsonValue;

use crate::errors::{DbError, DbResult};
use crate::schema::{Row, Value};

/// One `column = value` clause
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub column: String,
    pub value: Value,
}

/// AND of equality clauses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Matches every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Single-clause predicate
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(column, value)
    }

    /// Adds a clause
    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Builds a predicate from a JSON object of `column: value` pairs.
    ///
    /// Values must be scalars; null, arrays and objects are rejected with a
    /// schema error.
    pub fn from_json(where_clause: &JsonValue) -> DbResult<Self> {
        let map = match where_clause {
            JsonValue::Null => return Ok(Self::all()),
            JsonValue::Object(map) => map,
            _ => return Err(DbError::schema("predicate must be a JSON object")),
        };

        let mut predicate = Self::all();
        for (column, raw) in map {
            let value = match raw {
                JsonValue::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => n.as_f64().map(Value::float).ok_or_else(|| {
                        DbError::schema(format!("unrepresentable number for column '{}'", column))
                    })?,
                },
                JsonValue::String(s) => Value::Str(s.clone()),
                JsonValue::Bool(b) => Value::Bool(*b),
                _ => {
                    return Err(DbError::schema(format!(
                        "predicate value for column '{}' must be a scalar",
                        column
                    )))
                }
            };
            predicate = predicate.and(column.clone(), value);
        }
        Ok(predicate)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns a copy with every clause value transformed by `f`.
    pub(crate) fn map_values<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Clause) -> Value,
    {
        Self {
            clauses: self
                .clauses
                .iter()
                .map(|c| Clause {
                    column: c.column.clone(),
                    value: f(c),
                })
                .collect(),
        }
    }

    /// Checks if a row matches all clauses (exact match, no coercion)
    pub fn matches(&self, row: &Row) -> bool {
        self.clauses
            .iter()
            .all(|clause| row.get(&clause.column) == Some(&clause.value))
    }
}
