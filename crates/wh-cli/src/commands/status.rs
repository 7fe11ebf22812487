//! Status command: ledger overview and effective shift configuration.

use anyhow::{Context, Result};

use wh_core::LedgerStore;

use crate::Config;
use crate::commands::report::format_hms;

/// Runs the status command.
pub fn run(config: &Config) -> Result<()> {
    let store = LedgerStore::new(&config.ledger_dir);

    println!("ledger directory: {}", store.dir().display());
    let years = store.years()?;
    if years.is_empty() {
        println!("no ledgers recorded");
    } else {
        for year in years {
            let ledger = store.load(year)?;
            println!("  {year}: {} record(s)", ledger.len());
        }
    }

    let shift = config.shift().context("invalid shift configuration")?;
    println!();
    println!("standard shift: {}", format_hms(shift.standard_duration));
    if config.rest_periods.is_empty() {
        println!("rest periods: (none)");
    } else {
        println!("rest periods: {}", config.rest_periods.join(", "));
    }

    Ok(())
}
