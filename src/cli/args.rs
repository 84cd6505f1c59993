//! CLI argument definitions using clap
//!
//! Commands:
//! - tabledb tables --config <path>
//! - tabledb dump <table> --config <path>
//! - tabledb verify --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tabledb - inspect a tabledb snapshot
#[derive(Parser, Debug)]
#[command(name = "tabledb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tables with their keys, indexes and row counts
    Tables {
        /// Path to configuration file
        #[arg(long, default_value = "./tabledb.json")]
        config: PathBuf,
    },

    /// Print every record of a table as a JSON array
    Dump {
        /// Table name
        table: String,

        /// Path to configuration file
        #[arg(long, default_value = "./tabledb.json")]
        config: PathBuf,
    },

    /// Load the snapshot and report what it holds
    Verify {
        /// Path to configuration file
        #[arg(long, default_value = "./tabledb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
