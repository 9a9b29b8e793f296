//! Usage detail page: query form state, refresh and chart assembly.

use chrono::{FixedOffset, Utc};
use serde::Serialize;
use serde_json::Value;

use super::Notification;
use crate::{
    analytics::{
        AggregationOptions, CacheHitPoint, RateMetrics, TimeRange, UsageDashboard, build_cache_hit_series,
        build_usage_dashboard,
    },
    charts::{call_count_chart, consumption_chart, token_cache_chart},
    local_store::{self, LocalStore},
    models::{Granularity, UserProfile},
    render::{ModelColorCache, QuotaFormatter},
    services::{ApiClient, UsageQuery, UsageScope},
};

const DAY_SECS: i64 = 86_400;

/// Form state for the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailQuery {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub granularity: Granularity,
    /// Admin only; empty means every user.
    pub username: String,
    pub model_name: String,
}

impl DetailQuery {
    /// Default window for a granularity: one day back for hourly buckets,
    /// thirty for weekly, seven otherwise. The end is an hour ahead so rows
    /// written during the current hour are included.
    pub fn with_defaults(granularity: Granularity, now: i64) -> Self {
        let lookback = match granularity {
            Granularity::Hour => DAY_SECS,
            Granularity::Week => 30 * DAY_SECS,
            Granularity::Day => 7 * DAY_SECS,
        };
        Self {
            start_timestamp: now - lookback,
            end_timestamp: now + 3600,
            granularity,
            username: String::new(),
            model_name: String::new(),
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_timestamp, self.end_timestamp)
    }

    fn usage_query(&self) -> UsageQuery {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        UsageQuery {
            start_timestamp: self.start_timestamp,
            end_timestamp: self.end_timestamp,
            granularity: self.granularity,
            username: non_empty(&self.username),
            model_name: non_empty(&self.model_name),
        }
    }
}

/// The last granularity the user picked, or `fallback`.
pub fn stored_granularity(store: &LocalStore, fallback: Granularity) -> Granularity {
    match store.get(local_store::DATA_EXPORT_DEFAULT_TIME) {
        Some(value) => value.parse().unwrap_or_else(|e| {
            tracing::warn!(value, error = %e, "Ignoring stored granularity");
            fallback
        }),
        None => fallback,
    }
}

pub fn persist_granularity(store: &mut LocalStore, granularity: Granularity) {
    store.set_or_warn(local_store::DATA_EXPORT_DEFAULT_TIME, granularity.as_str());
}

/// Everything the detail view renders after a refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailView {
    pub dashboard: Option<UsageDashboard>,
    pub cache_hits: Vec<CacheHitPoint>,
    pub profile: Option<UserProfile>,
    /// `None` until usage has loaded, or when the window is empty.
    pub rates: Option<RateMetrics>,
    pub notifications: Vec<Notification>,
}

/// Chart configurations for the three detail charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailCharts {
    pub call_count: Value,
    pub consumption: Value,
    pub token_cache: Value,
}

/// Detail page controller.
///
/// Model colors persist across refreshes for the life of the page, so a
/// model keeps its color when the window or granularity changes.
#[derive(Debug)]
pub struct DetailPage {
    client: ApiClient,
    formatter: QuotaFormatter,
    offset: FixedOffset,
    admin: bool,
    colors: ModelColorCache,
    query: DetailQuery,
    view: DetailView,
}

impl DetailPage {
    pub fn new(client: ApiClient, formatter: QuotaFormatter, offset: FixedOffset, admin: bool, query: DetailQuery) -> Self {
        Self {
            client,
            formatter,
            offset,
            admin,
            colors: ModelColorCache::new(),
            query,
            view: DetailView::default(),
        }
    }

    pub fn query(&self) -> &DetailQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: DetailQuery) {
        self.query = query;
    }

    /// Change granularity and remember it for the next visit.
    pub fn set_granularity(&mut self, granularity: Granularity, store: &mut LocalStore) {
        if self.query.granularity != granularity {
            self.query.granularity = granularity;
            persist_granularity(store, granularity);
        }
    }

    pub fn view(&self) -> &DetailView {
        &self.view
    }

    pub fn formatter(&self) -> &QuotaFormatter {
        &self.formatter
    }

    /// Reload usage, then cache hits, with the profile fetched alongside.
    ///
    /// Each failed call adds a notification; data from calls that succeeded
    /// is still applied, and a failed call leaves its previous data in place.
    /// Taking `&mut self` keeps a page to one refresh at a time.
    pub async fn refresh(&mut self) -> &DetailView {
        self.view.notifications.clear();

        let scope = if self.admin {
            UsageScope::Admin {
                username: Some(self.query.username.clone()),
            }
        } else {
            UsageScope::Own
        };
        let usage_query = self.query.usage_query();

        let client = &self.client;
        let ((usage, cache_hits), profile) = tokio::join!(
            async {
                let usage = client.usage_data(&scope, &usage_query).await;
                let cache_hits = client.token_cache_hits(&usage_query).await;
                (usage, cache_hits)
            },
            client.user_self(),
        );

        match usage {
            Ok(records) => {
                let options = AggregationOptions {
                    granularity: self.query.granularity,
                    offset: self.offset,
                    now: Utc::now().timestamp(),
                };
                let dashboard = build_usage_dashboard(records, &options, &mut self.colors);
                self.view.rates = dashboard.totals.rates(&self.query.range());
                self.view.dashboard = Some(dashboard);
            }
            Err(e) => self.view.notifications.push(Notification::from_error("usage_data", &e)),
        }

        match cache_hits {
            Ok(records) => self.view.cache_hits = build_cache_hit_series(&records),
            Err(e) => self
                .view
                .notifications
                .push(Notification::from_error("token_cache_hits", &e)),
        }

        match profile {
            Ok(profile) => self.view.profile = Some(profile),
            Err(e) => self.view.notifications.push(Notification::from_error("user_self", &e)),
        }

        tracing::info!(
            granularity = %self.query.granularity,
            notifications = self.view.notifications.len(),
            "Detail page refreshed"
        );
        &self.view
    }

    /// Chart configurations for the current view, once usage has loaded.
    pub fn charts(&self) -> Option<DetailCharts> {
        let dashboard = self.view.dashboard.as_ref()?;
        Some(DetailCharts {
            call_count: call_count_chart(&dashboard.call_counts, &dashboard.model_colors, dashboard.totals.requests),
            consumption: consumption_chart(
                &dashboard.consumption,
                &dashboard.model_colors,
                dashboard.totals.quota,
                &self.formatter,
            ),
            token_cache: token_cache_chart(&self.view.cache_hits),
        })
    }
}
