//! JSON output for the CLI
//!
//! Results go to stdout as a single pretty-printed JSON value. Logs go to
//! stderr, so stdout can be piped.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a JSON value to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    write_json_to(&mut stdout, value)
}

pub(crate) fn write_json_to<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
