//! Per-day duration computation.
//!
//! Turns one day's observed attendance span into gross, effective, and
//! overtime durations. Pure and deterministic given identical inputs.

use chrono::{Duration, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::record::DayRecord;
use crate::rest::overlap_duration;
use crate::shift::ShiftConfig;

/// Why a day's totals could not be computed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DayComputeError {
    /// The record is missing its first or last timestamp.
    #[error("{date}: no observed {missing} time")]
    MissingTime {
        date: NaiveDate,
        missing: &'static str,
    },

    /// The last timestamp is not after the first; a data-quality fault in
    /// the upstream extraction, reported rather than clamped.
    #[error("{date}: last time {last} is not after first time {first}")]
    NonPositiveSpan {
        date: NaiveDate,
        first: NaiveTime,
        last: NaiveTime,
    },
}

/// Computed durations for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    /// Elapsed time between first and last timestamp, rest included.
    pub gross: Duration,
    /// Gross duration minus overlapping configured rest time.
    pub effective: Duration,
    /// Effective duration in excess of the standard shift, floored at zero.
    pub overtime: Duration,
}

/// Computes the day's totals from its attendance span and the shift config.
pub fn compute_day(record: &DayRecord, config: &ShiftConfig) -> Result<DayTotals, DayComputeError> {
    let first = record.first_time.ok_or(DayComputeError::MissingTime {
        date: record.date,
        missing: "first",
    })?;
    let last = record.last_time.ok_or(DayComputeError::MissingTime {
        date: record.date,
        missing: "last",
    })?;

    if last <= first {
        return Err(DayComputeError::NonPositiveSpan {
            date: record.date,
            first,
            last,
        });
    }

    let gross = last - first;
    let rest = overlap_duration(first, last, &config.rest_intervals, config.overlap_policy);
    let effective = gross - rest;
    let overtime = (effective - config.standard_duration).max(Duration::zero());

    Ok(DayTotals {
        gross,
        effective,
        overtime,
    })
}
