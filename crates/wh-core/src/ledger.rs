//! The per-year ledger and its merge logic.
//!
//! A ledger holds at most one record per calendar date, kept in ascending
//! date order. Merging is idempotent: records for dates already present are
//! dropped, so re-importing the same batch never changes the stored values.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::record::{DayRecord, LineParseError};

/// What to do with a ledger line that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLine {
    /// Drop the line, log it, and keep reading.
    #[default]
    Skip,
    /// Stop reading and surface the parse error.
    Fail,
}

/// Why a ledger could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerReadError {
    /// A line failed to parse under [`MalformedLine::Fail`].
    #[error("line {line_number}: {source}")]
    Malformed {
        line_number: usize,
        source: LineParseError,
    },
}

/// Counts from one merge operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Records appended to the ledger.
    pub added: usize,
    /// Incoming records dropped because their date was already recorded.
    pub skipped_existing: usize,
}

/// One year's attendance history: date-ordered, one record per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    year: i32,
    records: Vec<DayRecord>,
}

impl Ledger {
    /// An empty ledger for the given year.
    pub const fn new(year: i32) -> Self {
        Self {
            year,
            records: Vec::new(),
        }
    }

    /// Builds a ledger from records in any order, restoring the invariant:
    /// ascending by date, first occurrence of a date wins.
    pub fn from_records(year: i32, records: Vec<DayRecord>) -> Self {
        let mut records = records;
        records.sort_by_key(|record| record.date);
        records.dedup_by_key(|record| record.date);
        Self { year, records }
    }

    /// Parses a ledger from its stored text form.
    ///
    /// Blank lines are ignored. Lines that do not parse are handled per the
    /// `on_malformed` policy; under [`MalformedLine::Skip`] each skipped
    /// line is logged with its line number.
    pub fn parse(
        year: i32,
        content: &str,
        on_malformed: MalformedLine,
    ) -> Result<Self, LedgerReadError> {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<DayRecord>() {
                Ok(record) => records.push(record),
                Err(source) => match on_malformed {
                    MalformedLine::Skip => {
                        tracing::warn!(line_number = idx + 1, %source, "skipping malformed ledger line");
                    }
                    MalformedLine::Fail => {
                        return Err(LedgerReadError::Malformed {
                            line_number: idx + 1,
                            source,
                        });
                    }
                },
            }
        }
        Ok(Self::from_records(year, records))
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merges newly observed records into the ledger.
    ///
    /// Incoming records whose date is already recorded are dropped; the
    /// first write for a date wins, and later imports never overwrite it.
    /// The surviving records are appended and the whole set re-sorted
    /// ascending by date.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = DayRecord>) -> MergeOutcome {
        let mut seen: HashSet<NaiveDate> =
            self.records.iter().map(|record| record.date).collect();

        let mut outcome = MergeOutcome::default();
        for record in incoming {
            if seen.insert(record.date) {
                self.records.push(record);
                outcome.added += 1;
            } else {
                outcome.skipped_existing += 1;
            }
        }

        self.records.sort_by_key(|record| record.date);
        outcome
    }
}

impl fmt::Display for Ledger {
    /// The stored text form: one record per line, trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}
