//! Folding raw power events into daily attendance records.
//!
//! The upstream collector reports boot and shutdown events with full
//! timestamps. Per date, the earliest boot becomes the day's first time and
//! the latest shutdown its last time; a side with no events stays unset.
//! The reference date (the still in-progress day) is excluded.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::record::DayRecord;

/// Kind of power event reported by the upstream extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerEventKind {
    Boot,
    Shutdown,
}

/// A single machine boot or shutdown observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerEvent {
    pub timestamp: NaiveDateTime,
    pub kind: PowerEventKind,
}

/// Folds events into one record per day, excluding `as_of` itself.
///
/// Records come out in ascending date order. Timestamps are trusted as
/// reported; no plausibility checks are applied.
pub fn fold_daily(events: &[PowerEvent], as_of: NaiveDate) -> Vec<DayRecord> {
    let mut days: BTreeMap<NaiveDate, (Option<NaiveTime>, Option<NaiveTime>)> = BTreeMap::new();

    for event in events {
        let date = event.timestamp.date();
        if date == as_of {
            continue;
        }
        let time = event.timestamp.time();
        let (first, last) = days.entry(date).or_default();
        match event.kind {
            PowerEventKind::Boot => {
                if first.is_none_or(|earliest| time < earliest) {
                    *first = Some(time);
                }
            }
            PowerEventKind::Shutdown => {
                if last.is_none_or(|latest| time > latest) {
                    *last = Some(time);
                }
            }
        }
    }

    days.into_iter()
        .map(|(date, (first_time, last_time))| DayRecord::new(date, first_time, last_time))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(d: u32, h: u32, m: u32, kind: PowerEventKind) -> PowerEvent {
        PowerEvent {
            timestamp: NaiveDate::from_ymd_opt(2024, 6, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
            kind,
        }
    }

    fn as_of(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn keeps_earliest_boot_and_latest_shutdown() {
        let events = [
            event(3, 9, 15, PowerEventKind::Boot),
            event(3, 8, 30, PowerEventKind::Boot),
            event(3, 12, 0, PowerEventKind::Shutdown),
            event(3, 18, 15, PowerEventKind::Shutdown),
        ];

        let records = fold_daily(&events, as_of(10));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(records[0].last_time, NaiveTime::from_hms_opt(18, 15, 0));
    }

    #[test]
    fn one_sided_days_keep_the_sentinel() {
        let events = [event(3, 8, 30, PowerEventKind::Boot)];
        let records = fold_daily(&events, as_of(10));
        assert_eq!(records[0].first_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(records[0].last_time, None);
    }

    #[test]
    fn excludes_the_as_of_date() {
        let events = [
            event(3, 8, 30, PowerEventKind::Boot),
            event(10, 9, 0, PowerEventKind::Boot),
        ];
        let records = fold_daily(&events, as_of(10));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, as_of(3));
    }

    #[test]
    fn records_are_date_ordered() {
        let events = [
            event(9, 8, 0, PowerEventKind::Boot),
            event(3, 8, 0, PowerEventKind::Boot),
            event(5, 8, 0, PowerEventKind::Boot),
        ];
        let records = fold_daily(&events, as_of(10));
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![as_of(3), as_of(5), as_of(9)]);
    }

    #[test]
    fn no_events_no_records() {
        assert!(fold_daily(&[], as_of(10)).is_empty());
    }

    #[test]
    fn event_json_shape() {
        let parsed: PowerEvent =
            serde_json::from_str(r#"{"timestamp":"2024-06-03T08:30:00","kind":"boot"}"#).unwrap();
        assert_eq!(parsed.kind, PowerEventKind::Boot);
        assert_eq!(
            parsed.timestamp.time(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
    }
}
