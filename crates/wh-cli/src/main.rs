use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wh_cli::commands::{collect, report, status};
use wh_cli::{Cli, Commands, Config};

/// Load configuration, failing fast when the shift definition is absent.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Collect { input, as_of }) => {
            let config = load_config(cli.config.as_deref())?;
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            collect::run(&config, input.as_deref(), as_of)?;
        }
        Some(Commands::Report { year, json }) => {
            let config = load_config(cli.config.as_deref())?;
            report::run(&config, *year, *json)?;
        }
        Some(Commands::Status) => {
            let config = load_config(cli.config.as_deref())?;
            status::run(&config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
