//! Row store subsystem for tabledb
//!
//! A `Table` owns its rows (an arena keyed by synthetic row id), its column
//! declarations, its indexes and its unique constraints.
//!
//! # Invariants
//!
//! - Every stored row has exactly the declared columns
//! - Indexes mirror the live rows with no stale or empty buckets
//! - A unique column holds each value in at most one row
//! - The primary key is never absent
//! - Row ids increase monotonically and are never reused

mod constraints;
mod predicate;
mod record;
mod table;

pub use constraints::{check_primary_key, ConstraintEnforcer};
pub use predicate::{Clause, Predicate};
pub use record::{row_to_json, Record, ROW_ID_FIELD};
pub use table::Table;
