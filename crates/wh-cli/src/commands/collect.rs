//! Collect command: merge newly observed power events into the ledgers.
//!
//! Reads boot/shutdown events as JSONL (stdin or `--input`), folds them into
//! one record per day, and merges each year's batch into its ledger. Merging
//! is idempotent, so re-running over the same events is safe.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

use wh_core::{DayRecord, LedgerStore, PowerEvent, fold_daily};

use crate::Config;

/// Runs the collect command.
pub fn run(config: &Config, input: Option<&Path>, as_of: NaiveDate) -> Result<()> {
    let events = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parse_events(BufReader::new(file))?
        }
        None => parse_events(io::stdin().lock())?,
    };

    let records = fold_daily(&events, as_of);
    if records.is_empty() {
        println!("no day records to merge");
        return Ok(());
    }

    let store = LedgerStore::new(&config.ledger_dir);
    let _lock = store
        .lock_exclusive()
        .context("failed to lock ledger directory")?;

    for (year, batch) in by_year(records) {
        let mut ledger = store.load_or_empty(year)?;
        let outcome = ledger.merge(batch);
        store.save(&ledger)?;

        tracing::info!(
            year,
            added = outcome.added,
            skipped = outcome.skipped_existing,
            "merged ledger"
        );
        println!(
            "{year}: {} added, {} already recorded ({} total)",
            outcome.added,
            outcome.skipped_existing,
            ledger.len()
        );
    }

    Ok(())
}

fn parse_events<R: BufRead>(reader: R) -> Result<Vec<PowerEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: PowerEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid event on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

fn by_year(records: Vec<DayRecord>) -> BTreeMap<i32, Vec<DayRecord>> {
    let mut years: BTreeMap<i32, Vec<DayRecord>> = BTreeMap::new();
    for record in records {
        years.entry(record.date.year()).or_default().push(record);
    }
    years
}
