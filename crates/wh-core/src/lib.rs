//! Core engine for the work-hours ledger.
//!
//! This crate contains the fundamental types and logic for:
//! - Ledger: per-year attendance records with idempotent, existing-wins merge
//! - Rest overlap: how much configured rest time falls inside a work span
//! - Workday totals: gross, effective, and overtime durations per day
//! - Event folding: collapsing boot/shutdown events into daily records

pub mod events;
pub mod ledger;
pub mod record;
pub mod rest;
pub mod shift;
pub mod store;
pub mod workday;

pub use events::{PowerEvent, PowerEventKind, fold_daily};
pub use ledger::{Ledger, LedgerReadError, MalformedLine, MergeOutcome};
pub use record::{DayRecord, LineParseError, NO_RECORD};
pub use rest::{OverlapPolicy, RestInterval, RestIntervalError, overlap_duration};
pub use shift::{ShiftConfig, ShiftConfigError};
pub use store::{LedgerStore, StoreError, StoreLock};
pub use workday::{DayComputeError, DayTotals, compute_day};
