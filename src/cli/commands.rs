//! CLI command implementations
//!
//! All commands are read-only: they open the database described by the
//! config file, inspect it, and print JSON. Nothing is written back.

use std::path::Path;

use serde_json::{json, Value};

use crate::database::{Database, DatabaseConfig};
use crate::table::{Predicate, Record, Table};

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::write_json;

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a specific command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Tables { config } => write_json(&tables(&open(&config)?)),
        Command::Dump { table, config } => write_json(&dump(&open(&config)?, &table)?),
        Command::Verify { config } => write_json(&verify(&open(&config)?)),
    }
}

/// Reads the config, falling back to defaults when the file is absent
pub fn load_config(path: &Path) -> CliResult<DatabaseConfig> {
    if !path.exists() {
        return Ok(DatabaseConfig::default());
    }
    Ok(DatabaseConfig::load(path)?)
}

fn open(config_path: &Path) -> CliResult<Database> {
    let config = load_config(config_path)?;
    Ok(Database::from_config(&config)?)
}

/// One summary object per table
pub fn tables(db: &Database) -> Value {
    let summaries: Vec<Value> = db
        .table_names()
        .filter_map(|name| db.get_table(name).ok())
        .map(table_summary)
        .collect();
    Value::Array(summaries)
}

fn table_summary(table: &Table) -> Value {
    let columns: serde_json::Map<String, Value> = table
        .columns()
        .iter()
        .map(|(name, kind)| (name.clone(), Value::from(kind.type_name())))
        .collect();
    json!({
        "name": table.name(),
        "primary_key": table.primary_key(),
        "columns": columns,
        "rows": table.len(),
        "next_row_id": table.next_row_id(),
        "unique": table.unique_columns(),
        "indexes": table.indexed_columns().collect::<Vec<_>>(),
    })
}

/// Every record of `table`, `_id` included, ascending row id
pub fn dump(db: &Database, table: &str) -> CliResult<Value> {
    let records = db.get_table(table)?.select(&Predicate::all())?;
    Ok(Value::Array(records.iter().map(Record::to_json).collect()))
}

/// Table and row counts of a successfully loaded database
pub fn verify(db: &Database) -> Value {
    let rows: usize = db
        .table_names()
        .filter_map(|name| db.get_table(name).ok())
        .map(Table::len)
        .sum();
    json!({
        "status": "ok",
        "snapshot_path": db.snapshot_path().display().to_string(),
        "tables": db.len(),
        "rows": rows,
    })
}
