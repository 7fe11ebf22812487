//! Command-line interface for the work-hours ledger.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
