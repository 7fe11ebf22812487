//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Work-hours ledger.
///
/// Merges observed machine boot/shutdown events into per-year attendance
/// ledgers and reports daily work, rest, and overtime durations.
#[derive(Debug, Parser)]
#[command(name = "wh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge newly observed boot/shutdown events into the ledgers.
    Collect {
        /// Read events from this JSONL file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Treat this date as today and exclude it (defaults to the
        /// current date).
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Render monthly work-hour tables for one year's ledger.
    Report {
        /// Year to report on.
        #[arg(long)]
        year: i32,

        /// Emit machine-readable JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Show ledger location, stored years, and the shift configuration.
    Status,
}
