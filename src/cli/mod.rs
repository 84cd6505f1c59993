//! CLI module for tabledb
//!
//! Read-only inspection of a snapshot:
//! - tables: list tables and their keys
//! - dump: print a table's records
//! - verify: load the snapshot and report counts

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{dump, load_config, run, run_command, tables, verify};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_json;
