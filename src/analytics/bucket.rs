use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::Granularity;

/// Display label for a bucket start in the given time zone.
///
/// Labels sort lexicographically in time order within a calendar year:
/// `01-15 08:00` (hour), `01-15` (day), `01-15 - 01-21` (week).
pub fn bucket_label(bucket_start: i64, granularity: Granularity, offset: &FixedOffset) -> String {
    let Some(start) = DateTime::from_timestamp(bucket_start, 0).map(|dt| dt.with_timezone(offset)) else {
        return bucket_start.to_string();
    };

    match granularity {
        Granularity::Hour => start.format("%m-%d %H:00").to_string(),
        Granularity::Day => start.format("%m-%d").to_string(),
        Granularity::Week => {
            let end = start + Duration::days(6);
            format!("{} - {}", start.format("%m-%d"), end.format("%m-%d"))
        }
    }
}

/// Inclusive query window in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn duration_secs(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Window length in minutes, or `None` for an empty or inverted window.
    pub fn minutes(&self) -> Option<f64> {
        let secs = self.duration_secs();
        (secs > 0).then(|| secs as f64 / 60.0)
    }
}
