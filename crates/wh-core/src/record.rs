//! Daily attendance records and the ledger line format.
//!
//! One record per calendar date, holding the earliest observed session start
//! and the latest observed session end. Records are persisted one per line as
//! `YYYY-MM-DD, HH:MM:SS, HH:MM:SS`, with [`NO_RECORD`] standing in for a
//! time that was never observed.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel written in place of a timestamp when no event was observed.
pub const NO_RECORD: &str = "none";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Why a ledger line failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineParseError {
    /// The line did not split into exactly three comma-separated fields.
    #[error("expected 3 comma-separated fields, got {count}")]
    FieldCount { count: usize },

    /// The date field was not a valid `YYYY-MM-DD` date.
    #[error("invalid date: {value:?}")]
    InvalidDate { value: String },

    /// A time field was neither `HH:MM:SS` nor the no-record sentinel.
    #[error("invalid time: {value:?}")]
    InvalidTime { value: String },
}

/// One day's observed attendance span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Calendar date; the natural key within a ledger.
    pub date: NaiveDate,
    /// Earliest observed session start, if any.
    pub first_time: Option<NaiveTime>,
    /// Latest observed session end, if any.
    pub last_time: Option<NaiveTime>,
}

impl DayRecord {
    pub const fn new(
        date: NaiveDate,
        first_time: Option<NaiveTime>,
        last_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            date,
            first_time,
            last_time,
        }
    }

    /// Whether both timestamps were observed, making the record computable.
    pub const fn is_complete(&self) -> bool {
        self.first_time.is_some() && self.last_time.is_some()
    }
}

fn parse_time_field(value: &str) -> Result<Option<NaiveTime>, LineParseError> {
    if value == NO_RECORD {
        return Ok(None);
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map(Some)
        .map_err(|_| LineParseError::InvalidTime {
            value: value.to_string(),
        })
}

fn format_time_field(value: Option<NaiveTime>) -> String {
    value.map_or_else(
        || NO_RECORD.to_string(),
        |time| time.format(TIME_FORMAT).to_string(),
    )
}

impl FromStr for DayRecord {
    type Err = LineParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(LineParseError::FieldCount {
                count: fields.len(),
            });
        }

        let date = NaiveDate::parse_from_str(fields[0], DATE_FORMAT).map_err(|_| {
            LineParseError::InvalidDate {
                value: fields[0].to_string(),
            }
        })?;
        let first_time = parse_time_field(fields[1])?;
        let last_time = parse_time_field(fields[2])?;

        Ok(Self {
            date,
            first_time,
            last_time,
        })
    }
}

impl fmt::Display for DayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.date.format(DATE_FORMAT),
            format_time_field(self.first_time),
            format_time_field(self.last_time)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn parses_complete_line() {
        let record: DayRecord = "2024-01-02, 08:30:00, 18:15:00".parse().unwrap();
        assert_eq!(record.date, date(2024, 1, 2));
        assert_eq!(record.first_time, Some(time(8, 30, 0)));
        assert_eq!(record.last_time, Some(time(18, 15, 0)));
        assert!(record.is_complete());
    }

    #[test]
    fn parses_sentinel_fields() {
        let record: DayRecord = "2024-01-02, none, 18:15:00".parse().unwrap();
        assert_eq!(record.first_time, None);
        assert_eq!(record.last_time, Some(time(18, 15, 0)));
        assert!(!record.is_complete());
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = "2024-01-02, 08:30:00".parse::<DayRecord>().unwrap_err();
        assert_eq!(err, LineParseError::FieldCount { count: 2 });

        let err = "2024-01-02, 08:30:00, 18:15:00, extra"
            .parse::<DayRecord>()
            .unwrap_err();
        assert_eq!(err, LineParseError::FieldCount { count: 4 });
    }

    #[test]
    fn rejects_bad_date() {
        let err = "not-a-date, 08:30:00, 18:15:00"
            .parse::<DayRecord>()
            .unwrap_err();
        assert!(matches!(err, LineParseError::InvalidDate { .. }));
    }

    #[test]
    fn rejects_bad_time() {
        let err = "2024-01-02, 8am, 18:15:00".parse::<DayRecord>().unwrap_err();
        assert!(matches!(err, LineParseError::InvalidTime { .. }));
    }

    #[test]
    fn line_roundtrip() {
        let line = "2024-01-02, 08:30:00, 18:15:00";
        let record: DayRecord = line.parse().unwrap();
        assert_eq!(record.to_string(), line);
    }

    #[test]
    fn sentinel_roundtrip() {
        let line = "2024-01-02, none, none";
        let record: DayRecord = line.parse().unwrap();
        assert_eq!(record.to_string(), line);
    }
}
