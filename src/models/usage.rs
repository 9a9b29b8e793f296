use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Model name used for the synthetic row that stands in for an empty result.
pub const NO_DATA_MODEL: &str = "no-data";

/// Pre-aggregated usage for one (model, time bucket) pair, as returned by
/// `/api/data/` and `/api/data/self/`.
///
/// The backend stores these hourly; `created_at` is the bucket start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub model_name: String,
    /// Unix timestamp in seconds
    #[serde(deserialize_with = "lenient_i64")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub count: i64,
    #[serde(default)]
    pub quota: f64,
    /// Absent from the admin aggregate query
    #[serde(default, deserialize_with = "lenient_i64")]
    pub token_used: i64,
}

impl UsageRecord {
    pub fn new(model_name: impl Into<String>, created_at: i64, count: i64, quota: f64, token_used: i64) -> Self {
        Self {
            id: None,
            user_id: None,
            username: None,
            model_name: model_name.into(),
            created_at,
            count,
            quota,
            token_used,
        }
    }

    /// All-zero row used when the backend returns no usage.
    pub fn placeholder(now: i64) -> Self {
        Self::new(NO_DATA_MODEL, now, 0, 0.0, 0)
    }
}

/// Prompt-cache statistics for one time bucket, as returned by
/// `/api/log/token/cache/hit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHitRecord {
    /// Bucket start, already formatted by the backend
    pub time: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub non_cache_tokens: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub cache_hit_tokens: i64,
}

/// Width of the time buckets used to aggregate usage for charting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hour,
    Day,
    Week,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Hour, Granularity::Day, Granularity::Week];

    /// Bucket width in seconds.
    pub const fn interval_secs(self) -> i64 {
        match self {
            Granularity::Hour => 3_600,
            Granularity::Day => 86_400,
            Granularity::Week => 604_800,
        }
    }

    /// Floor a unix timestamp to the start of its bucket.
    pub fn truncate(self, timestamp: i64) -> i64 {
        let interval = self.interval_secs();
        timestamp.div_euclid(interval) * interval
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown granularity '{0}' (expected hour, day or week)")]
pub struct ParseGranularityError(String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

/// Accepts integers and integral floats; the backend emits SQL decimals as
/// JSON floats for some aggregates. Fractional or out-of-range floats are
/// rejected rather than rounded or clamped.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(v) => Ok(v),
        Number::Float(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => Ok(v as i64),
        Number::Float(v) => Err(serde::de::Error::custom(format!("expected an integer, got {v}"))),
    }
}
