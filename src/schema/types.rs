//! Column type definitions
//!
//! Supported kinds:
//! - int: 64-bit signed integer
//! - float: 64-bit floating point (integers accepted on write)
//! - str: UTF-8 string
//! - bool: Boolean

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Scalar kind of a declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Str,
    Bool,
}

impl ColumnType {
    /// Returns the type name used on the wire and in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Str => "str",
            ColumnType::Bool => "bool",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(ColumnType::Int),
            "float" => Ok(ColumnType::Float),
            "str" => Ok(ColumnType::Str),
            "bool" => Ok(ColumnType::Bool),
            other => Err(format!("unknown column type '{}'", other)),
        }
    }
}

/// Column declarations of a table: name -> kind
pub type Columns = BTreeMap<String, ColumnType>;

/// A canonical record: column name -> typed value
pub type Row = BTreeMap<String, Value>;

/// Builds a column declaration map from `(name, kind)` pairs.
pub fn columns<I, S>(decls: I) -> Columns
where
    I: IntoIterator<Item = (S, ColumnType)>,
    S: Into<String>,
{
    decls.into_iter().map(|(n, t)| (n.into(), t)).collect()
}
