use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use super::{TimeRange, bucket_label};
use crate::{
    models::{CacheHitRecord, Granularity, UsageRecord},
    render::ModelColorCache,
};

/// Charts always show at least this many buckets.
pub const MIN_BUCKETS: usize = 7;

pub const NON_CACHE_TOKENS: &str = "Non-Cache Tokens";
pub const CACHE_HIT_TOKENS: &str = "Cache Hit Tokens";

/// One pie slice: total calls for a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCountPoint {
    #[serde(rename = "type")]
    pub model: String,
    pub value: i64,
}

/// One stacked-bar segment: quota a model consumed in a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionPoint {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Usage")]
    pub usage: f64,
}

/// One stacked-bar segment of the token cache chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHitPoint {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Value")]
    pub value: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Quota consumed, in raw quota units
    pub quota: f64,
    pub tokens: i64,
    pub requests: i64,
}

/// Average requests and tokens per minute over a query window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    pub rpm: f64,
    pub tpm: f64,
}

impl UsageTotals {
    /// Per-minute averages, or `None` when the window is empty or ends
    /// before it starts.
    pub fn rates(&self, range: &TimeRange) -> Option<RateMetrics> {
        let minutes = range.minutes()?;
        Some(RateMetrics {
            rpm: self.requests as f64 / minutes,
            tpm: self.tokens as f64 / minutes,
        })
    }
}

/// Everything the usage charts and summary cards need for one query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDashboard {
    pub granularity: Granularity,
    /// Sorted by value, descending
    pub call_counts: Vec<CallCountPoint>,
    /// Sorted by bucket label, ascending
    pub consumption: Vec<ConsumptionPoint>,
    pub model_colors: BTreeMap<String, String>,
    pub totals: UsageTotals,
}

/// Inputs to [`build_usage_dashboard`] besides the records themselves.
#[derive(Debug, Clone, Copy)]
pub struct AggregationOptions {
    pub granularity: Granularity,
    /// Time zone used for bucket labels
    pub offset: FixedOffset,
    /// Timestamp given to the placeholder row when there is no data
    pub now: i64,
}

/// Build chart series from raw usage rows.
///
/// Empty input is replaced by a single zero placeholder row so every chart
/// still has something to draw. Timelines with fewer than [`MIN_BUCKETS`]
/// distinct buckets are replaced by exactly that many buckets ending at the
/// latest observed bucket. Usage in an observed bucket older than that window
/// is not charted; `totals` still counts every row.
pub fn build_usage_dashboard(
    mut records: Vec<UsageRecord>,
    options: &AggregationOptions,
    colors: &mut ModelColorCache,
) -> UsageDashboard {
    if records.is_empty() {
        records.push(UsageRecord::placeholder(options.now));
    }
    records.sort_by_key(|r| r.created_at);

    let granularity = options.granularity;
    let interval = granularity.interval_secs();

    let mut models: Vec<String> = Vec::new();
    let mut model_index: HashMap<String, usize> = HashMap::new();
    let mut call_counts: Vec<CallCountPoint> = Vec::new();
    let mut usage: HashMap<(i64, usize), f64> = HashMap::new();
    let mut buckets: BTreeSet<i64> = BTreeSet::new();
    let mut totals = UsageTotals::default();

    for record in &records {
        let bucket = granularity.truncate(record.created_at);
        buckets.insert(bucket);

        let idx = match model_index.get(&record.model_name) {
            Some(&idx) => idx,
            None => {
                let idx = models.len();
                models.push(record.model_name.clone());
                model_index.insert(record.model_name.clone(), idx);
                call_counts.push(CallCountPoint {
                    model: record.model_name.clone(),
                    value: 0,
                });
                idx
            }
        };

        call_counts[idx].value = call_counts[idx].value.saturating_add(record.count);
        *usage.entry((bucket, idx)).or_insert(0.0) += record.quota;

        totals.quota += record.quota;
        totals.tokens = totals.tokens.saturating_add(record.token_used);
        totals.requests = totals.requests.saturating_add(record.count);
    }

    let latest = buckets.last().copied();
    let timeline: BTreeSet<i64> = match latest {
        Some(latest) if buckets.len() < MIN_BUCKETS => (0..MIN_BUCKETS as i64)
            .map(|i| latest.saturating_sub(i.saturating_mul(interval)))
            .collect(),
        _ => buckets,
    };

    let mut consumption = Vec::with_capacity(timeline.len() * models.len());
    for &bucket in &timeline {
        let label = bucket_label(bucket, granularity, &options.offset);
        for (idx, model) in models.iter().enumerate() {
            consumption.push(ConsumptionPoint {
                time: label.clone(),
                model: model.clone(),
                usage: usage.get(&(bucket, idx)).copied().unwrap_or(0.0),
            });
        }
    }

    // Both sorts are stable: ties keep first-seen model order
    call_counts.sort_by(|a, b| b.value.cmp(&a.value));
    consumption.sort_by(|a, b| a.time.cmp(&b.time));

    let model_colors = models
        .iter()
        .map(|model| (model.clone(), colors.resolve(model)))
        .collect();

    tracing::debug!(
        records = records.len(),
        models = models.len(),
        buckets = timeline.len(),
        granularity = %granularity,
        "Built usage dashboard"
    );

    UsageDashboard {
        granularity,
        call_counts,
        consumption,
        model_colors,
        totals,
    }
}

/// Flatten cache statistics into two chart rows per bucket.
pub fn build_cache_hit_series(records: &[CacheHitRecord]) -> Vec<CacheHitPoint> {
    records
        .iter()
        .flat_map(|record| {
            [
                CacheHitPoint {
                    time: record.time.clone(),
                    kind: NON_CACHE_TOKENS.to_string(),
                    value: record.non_cache_tokens,
                },
                CacheHitPoint {
                    time: record.time.clone(),
                    kind: CACHE_HIT_TOKENS.to_string(),
                    value: record.cache_hit_tokens,
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_DATA_MODEL;

    fn options(granularity: Granularity) -> AggregationOptions {
        AggregationOptions {
            granularity,
            offset: FixedOffset::east_opt(0).unwrap(),
            now: 1_704_067_200,
        }
    }

    fn distinct_times(dashboard: &UsageDashboard) -> BTreeSet<String> {
        dashboard.consumption.iter().map(|p| p.time.clone()).collect()
    }

    #[test]
    fn test_single_record_example() {
        let records = vec![UsageRecord::new("gpt-4", 1000, 2, 10.0, 100)];
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Hour), &mut colors);

        assert_eq!(
            dashboard.call_counts,
            vec![CallCountPoint {
                model: "gpt-4".into(),
                value: 2
            }]
        );

        // floor(1000 / 3600) * 3600 = 0 -> 01-01 00:00 in UTC
        let bucket = bucket_label(0, Granularity::Hour, &FixedOffset::east_opt(0).unwrap());
        let observed: Vec<_> = dashboard.consumption.iter().filter(|p| p.time == bucket).collect();
        assert_eq!(observed.len(), 1);
        assert_eq!(observed[0].usage, 10.0);

        assert_eq!(dashboard.consumption.len(), MIN_BUCKETS);
        let zeros = dashboard.consumption.iter().filter(|p| p.usage == 0.0).count();
        assert_eq!(zeros, 6);

        assert_eq!(dashboard.totals.quota, 10.0);
        assert_eq!(dashboard.totals.tokens, 100);
        assert_eq!(dashboard.totals.requests, 2);
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(Vec::new(), &options(Granularity::Day), &mut colors);

        assert_eq!(dashboard.call_counts.len(), 1);
        assert_eq!(dashboard.call_counts[0].model, NO_DATA_MODEL);
        assert_eq!(dashboard.call_counts[0].value, 0);
        assert_eq!(dashboard.consumption.len(), MIN_BUCKETS);
        assert!(dashboard.consumption.iter().all(|p| p.usage == 0.0));
        assert!(dashboard.model_colors.contains_key(NO_DATA_MODEL));
    }

    #[test]
    fn test_short_timeline_is_padded_to_window_ending_at_latest() {
        let hour = 3_600;
        let base = 1_704_067_200;
        let records = vec![
            UsageRecord::new("gpt-4", base + 10 * hour + 5, 1, 3.0, 10),
            UsageRecord::new("glm-4", base + 8 * hour, 1, 2.0, 10),
        ];
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Hour), &mut colors);

        let times = distinct_times(&dashboard);
        assert_eq!(times.len(), MIN_BUCKETS);
        let offset = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            times.last().unwrap(),
            &bucket_label(base + 10 * hour, Granularity::Hour, &offset)
        );
        assert_eq!(
            times.first().unwrap(),
            &bucket_label(base + 4 * hour, Granularity::Hour, &offset)
        );
        // Every bucket has a row per model
        assert_eq!(dashboard.consumption.len(), MIN_BUCKETS * 2);
    }

    #[test]
    fn test_sparse_timeline_keeps_exactly_seven_buckets() {
        let hour = 3_600;
        let base = 1_704_067_200;
        let records = vec![
            UsageRecord::new("gpt-4", base, 1, 4.0, 10),
            UsageRecord::new("gpt-4", base + 10 * hour, 1, 1.0, 10),
        ];
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Hour), &mut colors);

        let offset = FixedOffset::east_opt(0).unwrap();
        let expected: BTreeSet<String> = (4..=10)
            .map(|h| bucket_label(base + h * hour, Granularity::Hour, &offset))
            .collect();
        assert_eq!(distinct_times(&dashboard), expected);
        assert_eq!(dashboard.consumption.len(), MIN_BUCKETS);

        // The row at `base` falls outside the window but still counts in totals
        let charted: f64 = dashboard.consumption.iter().map(|p| p.usage).sum();
        assert_eq!(charted, 1.0);
        assert_eq!(dashboard.totals.quota, 5.0);
        assert_eq!(dashboard.totals.requests, 2);
    }

    #[test]
    fn test_long_timeline_is_not_padded() {
        let day = 86_400;
        let records: Vec<_> = (0..10)
            .map(|i| UsageRecord::new("gpt-4", 1_704_067_200 + i * day, 1, 1.0, 1))
            .collect();
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Day), &mut colors);
        assert_eq!(distinct_times(&dashboard).len(), 10);
    }

    #[test]
    fn test_sums_match_totals() {
        let hour = 3_600;
        let base = 1_704_067_200;
        let records = vec![
            UsageRecord::new("gpt-4", base, 3, 1.5, 100),
            UsageRecord::new("gpt-4", base + 20, 2, 2.25, 50),
            UsageRecord::new("claude-2.1", base + hour, 4, 7.0, 70),
            UsageRecord::new("qwen-max", base + 5 * hour, 1, 0.1, 5),
            UsageRecord::new("claude-2.1", base + 2 * hour, 1, 0.2, 5),
        ];
        let total_count: i64 = records.iter().map(|r| r.count).sum();
        let total_quota: f64 = records.iter().map(|r| r.quota).sum();

        for granularity in Granularity::ALL {
            let mut colors = ModelColorCache::new();
            let dashboard = build_usage_dashboard(records.clone(), &options(granularity), &mut colors);

            let counted: i64 = dashboard.call_counts.iter().map(|p| p.value).sum();
            assert_eq!(counted, total_count);

            let consumed: f64 = dashboard.consumption.iter().map(|p| p.usage).sum();
            assert!((consumed - total_quota).abs() < 1e-9, "{granularity}: {consumed} != {total_quota}");
        }
    }

    #[test]
    fn test_buckets_merge_within_interval() {
        let base = 1_704_067_200;
        let records = vec![
            UsageRecord::new("gpt-4", base + 60, 1, 1.0, 1),
            UsageRecord::new("gpt-4", base + 1_800, 1, 2.0, 1),
        ];
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Hour), &mut colors);
        let max = dashboard
            .consumption
            .iter()
            .map(|p| p.usage)
            .fold(0.0_f64, f64::max);
        assert_eq!(max, 3.0);
    }

    #[test]
    fn test_call_counts_sorted_descending() {
        let base = 1_704_067_200;
        let records = vec![
            UsageRecord::new("a", base, 1, 0.0, 0),
            UsageRecord::new("b", base, 5, 0.0, 0),
            UsageRecord::new("c", base, 3, 0.0, 0),
        ];
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Hour), &mut colors);
        let order: Vec<_> = dashboard.call_counts.iter().map(|p| p.model.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_consumption_sorted_by_label() {
        let day = 86_400;
        let records: Vec<_> = (0..8)
            .rev()
            .map(|i| UsageRecord::new("m", 1_704_067_200 + i * day, 1, 1.0, 1))
            .collect();
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Day), &mut colors);
        let labels: Vec<_> = dashboard.consumption.iter().map(|p| p.time.clone()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_colors_stable_across_refreshes() {
        let records = vec![
            UsageRecord::new("my-private-model", 1_704_067_200, 1, 1.0, 1),
            UsageRecord::new("gpt-4", 1_704_067_200, 1, 1.0, 1),
        ];
        let mut colors = ModelColorCache::new();
        let first = build_usage_dashboard(records.clone(), &options(Granularity::Hour), &mut colors);
        let second = build_usage_dashboard(records, &options(Granularity::Week), &mut colors);
        assert_eq!(first.model_colors, second.model_colors);
        assert_eq!(first.model_colors["gpt-4"], "rgb(135,206,235)");
    }

    #[test]
    fn test_rates() {
        let totals = UsageTotals {
            quota: 0.0,
            tokens: 6_000,
            requests: 120,
        };
        let rates = totals.rates(&TimeRange::new(0, 3_600)).unwrap();
        assert_eq!(rates.rpm, 2.0);
        assert_eq!(rates.tpm, 100.0);

        assert!(totals.rates(&TimeRange::new(50, 50)).is_none());
        assert!(totals.rates(&TimeRange::new(3_600, 0)).is_none());
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let records = vec![
            UsageRecord::new("gpt-4", 1000, i64::MAX, 1.0, i64::MAX),
            UsageRecord::new("gpt-4", 1000, 5, 1.0, 5),
        ];
        let mut colors = ModelColorCache::new();
        let dashboard = build_usage_dashboard(records, &options(Granularity::Hour), &mut colors);

        assert_eq!(dashboard.totals.requests, i64::MAX);
        assert_eq!(dashboard.totals.tokens, i64::MAX);
        assert_eq!(dashboard.call_counts[0].value, i64::MAX);
    }

    #[test]
    fn test_cache_hit_series_flattens_each_row() {
        let records = vec![
            CacheHitRecord {
                time: "2024-01-01 00:00:00".into(),
                non_cache_tokens: 900,
                cache_hit_tokens: 100,
            },
            CacheHitRecord {
                time: "2024-01-01 01:00:00".into(),
                non_cache_tokens: 50,
                cache_hit_tokens: 0,
            },
        ];
        let series = build_cache_hit_series(&records);
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].kind, NON_CACHE_TOKENS);
        assert_eq!(series[0].value, 900);
        assert_eq!(series[1].kind, CACHE_HIT_TOKENS);
        assert_eq!(series[1].value, 100);
        assert_eq!(series[3].time, "2024-01-01 01:00:00");
    }

    #[test]
    fn test_series_serialize_with_chart_field_names() {
        let point = ConsumptionPoint {
            time: "01-01".into(),
            model: "gpt-4".into(),
            usage: 1.5,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json, serde_json::json!({"Time": "01-01", "Model": "gpt-4", "Usage": 1.5}));

        let slice = serde_json::to_value(CallCountPoint {
            model: "gpt-4".into(),
            value: 2,
        })
        .unwrap();
        assert_eq!(slice, serde_json::json!({"type": "gpt-4", "value": 2}));
    }
}
