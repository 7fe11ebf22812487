//! Report command: monthly work-hour tables for one year.
//!
//! For each ledger record the daily totals are computed and appended to the
//! month's table. The report is derived in full from the ledger on every
//! run; the ledger's ordering and uniqueness invariants make the output
//! stable across re-runs.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveTime};
use serde::Serialize;

use wh_core::{DayRecord, DayTotals, Ledger, LedgerStore, NO_RECORD, ShiftConfig, compute_day};

use crate::Config;

const MONTHS_PER_YEAR: u32 = 12;

/// One computed report row.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub record: DayRecord,
    pub totals: DayTotals,
}

/// All rows for one calendar month.
#[derive(Debug, Clone)]
pub struct MonthTable {
    pub month: u32,
    pub rows: Vec<ReportRow>,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub year: i32,
    /// Always twelve tables, January first.
    pub months: Vec<MonthTable>,
    /// Records dropped for missing timestamps or a non-positive span.
    pub skipped: usize,
}

// ========== Report Generation ==========

/// Builds report data from a ledger.
///
/// Records whose totals cannot be computed (sentinel timestamps, or a last
/// time not after the first) are skipped with a warning rather than
/// aborting the report.
pub fn build_report(ledger: &Ledger, shift: &ShiftConfig) -> ReportData {
    let mut months: Vec<MonthTable> = (1..=MONTHS_PER_YEAR)
        .map(|month| MonthTable {
            month,
            rows: Vec::new(),
        })
        .collect();
    let mut skipped = 0;

    for record in ledger.records() {
        match compute_day(record, shift) {
            Ok(totals) => {
                let index = record.date.month0() as usize;
                months[index].rows.push(ReportRow {
                    record: record.clone(),
                    totals,
                });
            }
            Err(err) => {
                tracing::warn!(%err, "skipping record");
                skipped += 1;
            }
        }
    }

    ReportData {
        year: ledger.year(),
        months,
        skipped,
    }
}

// ========== Duration Formatting ==========

/// Formats a duration as `H:MM:SS` (hours unpadded, sign preserved).
pub fn format_hms(duration: Duration) -> String {
    let total = duration.num_seconds();
    let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{sign}{hours}:{minutes:02}:{seconds:02}")
}

fn format_time(value: Option<NaiveTime>) -> String {
    value.map_or_else(
        || NO_RECORD.to_string(),
        |time| time.format("%H:%M:%S").to_string(),
    )
}

// ========== Human-Readable Output ==========

fn header_row() -> String {
    format!(
        "{:<10}  {:>8}  {:>8}  {:>9}  {:>9}  {:>9}",
        "date", "first", "last", "gross", "effective", "overtime"
    )
}

fn format_row(row: &ReportRow) -> String {
    format!(
        "{:<10}  {:>8}  {:>8}  {:>9}  {:>9}  {:>9}",
        row.record.date.format("%Y-%m-%d").to_string(),
        format_time(row.record.first_time),
        format_time(row.record.last_time),
        format_hms(row.totals.gross),
        format_hms(row.totals.effective),
        format_hms(row.totals.overtime),
    )
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    writeln!(output, "WORK HOURS: {}", data.year).unwrap();

    for table in &data.months {
        writeln!(output).unwrap();
        writeln!(output, "{:02}", table.month).unwrap();
        writeln!(output, "──").unwrap();

        if table.rows.is_empty() {
            writeln!(output, "(no records)").unwrap();
            continue;
        }

        writeln!(output, "{}", header_row()).unwrap();
        for row in &table.rows {
            writeln!(output, "{}", format_row(row)).unwrap();
        }
    }

    if data.skipped > 0 {
        writeln!(output).unwrap();
        writeln!(
            output,
            "{} record(s) skipped; run with --verbose for details",
            data.skipped
        )
        .unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub year: i32,
    pub months: Vec<JsonMonth>,
}

#[derive(Debug, Serialize)]
pub struct JsonMonth {
    pub month: u32,
    pub rows: Vec<JsonRow>,
}

#[derive(Debug, Serialize)]
pub struct JsonRow {
    pub date: String,
    pub first_time: String,
    pub last_time: String,
    pub gross: String,
    pub effective: String,
    pub overtime: String,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let months = data
        .months
        .iter()
        .map(|table| JsonMonth {
            month: table.month,
            rows: table
                .rows
                .iter()
                .map(|row| JsonRow {
                    date: row.record.date.format("%Y-%m-%d").to_string(),
                    first_time: format_time(row.record.first_time),
                    last_time: format_time(row.record.last_time),
                    gross: format_hms(row.totals.gross),
                    effective: format_hms(row.totals.effective),
                    overtime: format_hms(row.totals.overtime),
                })
                .collect(),
        })
        .collect();

    let report = JsonReport {
        year: data.year,
        months,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
///
/// A missing ledger for the requested year is a hard failure here: the
/// read-only report path has no merge step to fall back on.
pub fn run(config: &Config, year: i32, json: bool) -> Result<()> {
    let shift = config.shift().context("invalid shift configuration")?;
    let store = LedgerStore::new(&config.ledger_dir);
    let ledger = store.load(year)?;

    let data = build_report(&ledger, &shift);
    if json {
        println!("{}", format_report_json(&data)?);
    } else {
        print!("{}", format_report(&data));
    }

    Ok(())
}
