//! Scalar value model
//!
//! `Value` is the canonical stored form of every cell. Raw input arrives as
//! `serde_json::Value` and is converted by the `coerce_*` functions below,
//! one function per source JSON kind.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};

use super::types::ColumnType;

/// A typed scalar cell value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    /// Creates a float value with negative zero folded into zero.
    pub fn float(f: f64) -> Self {
        Value::Float(if f == 0.0 { 0.0 } else { f })
    }

    /// Returns the kind this value naturally belongs to
    pub fn kind(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::Str(_) => ColumnType::Str,
            Value::Bool(_) => ColumnType::Bool,
        }
    }

    /// Lossless conversion to `kind` for comparisons.
    ///
    /// Int widens to Float, and a whole Float narrows to Int. Every other
    /// pair is returned unchanged and will not compare equal to values of the
    /// column's kind.
    pub fn normalized_for(&self, kind: ColumnType) -> Value {
        match (self, kind) {
            (Value::Int(i), ColumnType::Float) => Value::float(*i as f64),
            (Value::Float(f), ColumnType::Int)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Value::Int(*f as i64)
            }
            _ => self.clone(),
        }
    }

    /// Converts to the JSON representation
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Bool(b) => JsonValue::Bool(*b),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn float_bits(f: f64) -> u64 {
        if f == 0.0 {
            0.0f64.to_bits()
        } else {
            f.to_bits()
        }
    }
}

// Floats compare by bit pattern (with zero folded) so that `Value` can key
// the hash indexes. Values of different variants are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => Self::float_bits(*f).hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bool(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => match Number::from_f64(*x) {
                Some(n) => write!(f, "{}", n),
                None => write!(f, "{}", x),
            },
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Returns the JSON kind name used in coercion error messages
pub fn json_kind(raw: &JsonValue) -> &'static str {
    match raw {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "int",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Coerces a raw JSON value to `kind`. Returns `None` when the value cannot
/// be represented; JSON null is never representable.
pub fn coerce(raw: &JsonValue, kind: ColumnType) -> Option<Value> {
    match raw {
        JsonValue::Number(n) => coerce_number(n, kind),
        JsonValue::String(s) => coerce_string(s, kind),
        JsonValue::Bool(b) => coerce_bool(*b, kind),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Coerces a JSON number
pub fn coerce_number(n: &Number, kind: ColumnType) -> Option<Value> {
    match kind {
        ColumnType::Int => {
            if let Some(i) = n.as_i64() {
                return Some(Value::Int(i));
            }
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(Value::Int(f as i64))
            } else {
                None
            }
        }
        ColumnType::Float => n.as_f64().filter(|f| f.is_finite()).map(Value::float),
        ColumnType::Str => Some(Value::Str(n.to_string())),
        ColumnType::Bool => None,
    }
}

/// Coerces a JSON string
pub fn coerce_string(s: &str, kind: ColumnType) -> Option<Value> {
    match kind {
        ColumnType::Int => s.trim().parse::<i64>().ok().map(Value::Int),
        ColumnType::Float => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::float),
        ColumnType::Str => Some(Value::Str(s.to_string())),
        ColumnType::Bool => {
            if s.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if s.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
    }
}

/// Coerces a JSON boolean
pub fn coerce_bool(b: bool, kind: ColumnType) -> Option<Value> {
    match kind {
        ColumnType::Bool => Some(Value::Bool(b)),
        ColumnType::Str => Some(Value::Str(b.to_string())),
        ColumnType::Int | ColumnType::Float => None,
    }
}
