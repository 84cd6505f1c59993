//! Schema subsystem for tabledb
//!
//! Column declarations are fixed when a table is created and are enforced on
//! every write.
//!
//! # Design Principles
//!
//! - Every stored value is a typed `Value`
//! - Unknown columns and nulls are always rejected
//! - Coercion is explicit, one function per source JSON kind
//! - Validation completes before any table mutation

pub mod types;
mod validator;
pub mod value;

pub use types::{columns, ColumnType, Columns, Row};
pub use validator::{SchemaValidator, ValidationMode};
pub use value::Value;
