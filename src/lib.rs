//! tabledb - a minimal single-process relational store
//!
//! Typed tables with primary-key and unique constraints, single-column
//! equality indexes, conjunctive equality selection, equality joins and
//! whole-database JSON snapshots.
//!
//! ```
//! use serde_json::json;
//! use tabledb::schema::{columns, ColumnType};
//! use tabledb::{Database, Predicate};
//!
//! let mut db = Database::new("example.snapshot.json");
//! db.create_table(
//!     "users",
//!     columns([("id", ColumnType::Int), ("name", ColumnType::Str)]),
//!     Some("id"),
//! )?;
//!
//! let users = db.get_table_mut("users")?;
//! users.insert(&json!({"id": 1, "name": "Alice"}))?;
//! assert_eq!(users.select(&Predicate::eq("id", 1))?.len(), 1);
//! # Ok::<(), tabledb::DbError>(())
//! ```

pub mod cli;
pub mod database;
pub mod errors;
pub mod index;
pub mod join;
pub mod observability;
pub mod schema;
pub mod snapshot;
pub mod table;

pub use database::{Database, DatabaseConfig};
pub use errors::{DbError, DbResult};
pub use index::RowId;
pub use schema::{ColumnType, Columns, Row, Value};
pub use table::{Predicate, Record, Table};
