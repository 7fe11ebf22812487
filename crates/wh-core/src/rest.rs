//! Rest intervals and their overlap with a work span.

use std::str::FromStr;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BOUNDARY_FORMAT: &str = "%H:%M";

/// Why a rest interval failed to parse or validate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestIntervalError {
    /// The value was not of the form `HH:MM-HH:MM`.
    #[error("expected \"HH:MM-HH:MM\", got {value:?}")]
    Format { value: String },

    /// A boundary was not a valid `HH:MM` time of day.
    #[error("invalid time of day: {value:?}")]
    InvalidBoundary { value: String },

    /// The start boundary was not before the end boundary.
    #[error("interval start {start} is not before end {end}")]
    Empty { start: NaiveTime, end: NaiveTime },
}

/// A recurring time-of-day window excluded from effective work time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl RestInterval {
    /// Creates an interval, requiring `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, RestIntervalError> {
        if start >= end {
            return Err(RestIntervalError::Empty { start, end });
        }
        Ok(Self { start, end })
    }

    fn length(&self) -> Duration {
        self.end - self.start
    }
}

impl FromStr for RestInterval {
    type Err = RestIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').ok_or_else(|| RestIntervalError::Format {
            value: s.to_string(),
        })?;
        let parse_boundary = |value: &str| {
            NaiveTime::parse_from_str(value.trim(), BOUNDARY_FORMAT).map_err(|_| {
                RestIntervalError::InvalidBoundary {
                    value: value.to_string(),
                }
            })
        };
        Self::new(parse_boundary(start)?, parse_boundary(end)?)
    }
}

/// How mutually overlapping rest intervals are summed.
///
/// With [`Self::SumIndependently`], each configured interval contributes its
/// own overlap with the work span; time covered by two configured intervals
/// is counted twice. [`Self::MergeThenSum`] coalesces the configured
/// intervals first so shared time is counted once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    #[default]
    SumIndependently,
    MergeThenSum,
}

/// Total rest time overlapping the work span `[work_start, work_end)`.
///
/// Each interval is classified against the span: fully contained intervals
/// contribute their whole length, disjoint intervals contribute nothing, and
/// partially overlapping intervals contribute the clipped portion.
pub fn overlap_duration(
    work_start: NaiveTime,
    work_end: NaiveTime,
    rest_intervals: &[RestInterval],
    policy: OverlapPolicy,
) -> Duration {
    let merged;
    let intervals = match policy {
        OverlapPolicy::SumIndependently => rest_intervals,
        OverlapPolicy::MergeThenSum => {
            merged = coalesce(rest_intervals);
            merged.as_slice()
        }
    };

    intervals
        .iter()
        .map(|rest| clipped_overlap(work_start, work_end, rest))
        .fold(Duration::zero(), |total, overlap| total + overlap)
}

fn clipped_overlap(work_start: NaiveTime, work_end: NaiveTime, rest: &RestInterval) -> Duration {
    if rest.start >= work_start && rest.end <= work_end {
        rest.length()
    } else if rest.end <= work_start || rest.start >= work_end {
        Duration::zero()
    } else {
        let overlap_start = work_start.max(rest.start);
        let overlap_end = work_end.min(rest.end);
        if overlap_end > overlap_start {
            overlap_end - overlap_start
        } else {
            Duration::zero()
        }
    }
}

/// Sorts intervals by start and merges any that touch or overlap.
fn coalesce(intervals: &[RestInterval]) -> Vec<RestInterval> {
    let mut sorted: Vec<RestInterval> = intervals.to_vec();
    sorted.sort_by_key(|interval| interval.start);

    let mut merged: Vec<RestInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}
