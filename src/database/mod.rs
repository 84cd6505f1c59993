//! Database: the set of named tables and their snapshot persistence
//!
//! Callers create tables through the database, then operate on them via
//! `get_table` / `get_table_mut`. Table lifecycle and snapshot save/load
//! are logged; row operations are not.

mod config;
mod database;

pub use config::{DatabaseConfig, DEFAULT_SNAPSHOT_PATH};
pub use database::Database;
