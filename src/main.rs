//! tabledb CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, and on failure prints
//! the error to stderr and exits non-zero.

use tabledb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
