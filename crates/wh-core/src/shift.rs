//! Shift configuration: standard duration and configured rest intervals.
//!
//! Loaded once per run from the persisted configuration document and passed
//! by reference into the duration calculator; nothing here is process-wide
//! mutable state.

use chrono::Duration;
use thiserror::Error;

use crate::rest::{OverlapPolicy, RestInterval, RestIntervalError};

/// Why the shift configuration failed to validate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShiftConfigError {
    /// The standard shift length was not of the form `H:MM`.
    #[error("invalid standard work hours {value:?}: expected \"H:MM\"")]
    InvalidStandardHours { value: String },

    /// A configured rest period failed to parse.
    #[error("invalid rest period {value:?}: {source}")]
    InvalidRestPeriod {
        value: String,
        source: RestIntervalError,
    },
}

/// The run's shift definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftConfig {
    /// Length of one full standard shift.
    pub standard_duration: Duration,
    /// Configured rest windows, in configuration order.
    pub rest_intervals: Vec<RestInterval>,
    /// How mutually overlapping rest windows are summed.
    pub overlap_policy: OverlapPolicy,
}

impl ShiftConfig {
    /// Builds a configuration from the persisted document's string fields.
    pub fn from_parts(
        standard_work_hours: &str,
        rest_periods: &[String],
    ) -> Result<Self, ShiftConfigError> {
        let standard_duration = parse_standard_hours(standard_work_hours)?;
        let rest_intervals = rest_periods
            .iter()
            .map(|period| {
                period
                    .parse()
                    .map_err(|source| ShiftConfigError::InvalidRestPeriod {
                        value: period.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            standard_duration,
            rest_intervals,
            overlap_policy: OverlapPolicy::default(),
        })
    }
}

/// Parses a standard shift length of the form `H:MM` (e.g. `"7:45"`).
fn parse_standard_hours(value: &str) -> Result<Duration, ShiftConfigError> {
    let invalid = || ShiftConfigError::InvalidStandardHours {
        value: value.to_string(),
    };

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    let hours: i64 = hours.trim().parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.trim().parse().map_err(|_| invalid())?;
    if hours < 0 || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    Ok(Duration::hours(hours) + Duration::minutes(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_hours() {
        let config = ShiftConfig::from_parts("7:45", &[]).unwrap();
        assert_eq!(
            config.standard_duration,
            Duration::hours(7) + Duration::minutes(45)
        );
    }

    #[test]
    fn parses_rest_periods_in_order() {
        let periods = vec!["12:00-13:00".to_string(), "15:00-15:15".to_string()];
        let config = ShiftConfig::from_parts("8:00", &periods).unwrap();
        assert_eq!(config.rest_intervals.len(), 2);
        assert_eq!(config.rest_intervals[0], "12:00-13:00".parse().unwrap());
    }

    #[test]
    fn default_policy_sums_independently() {
        let config = ShiftConfig::from_parts("8:00", &[]).unwrap();
        assert_eq!(config.overlap_policy, OverlapPolicy::SumIndependently);
    }

    #[test]
    fn rejects_malformed_standard_hours() {
        for value in ["745", "7:xx", "7:75", "-1:00"] {
            assert!(
                matches!(
                    ShiftConfig::from_parts(value, &[]),
                    Err(ShiftConfigError::InvalidStandardHours { .. })
                ),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_rest_period() {
        let periods = vec!["lunch".to_string()];
        let err = ShiftConfig::from_parts("8:00", &periods).unwrap_err();
        assert!(matches!(err, ShiftConfigError::InvalidRestPeriod { .. }));
    }
}
