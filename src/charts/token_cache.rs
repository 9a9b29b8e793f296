use serde_json::{Value, json};

use super::{CHART_PADDING, axes, hover_outline, stacked_legends, title};
use crate::analytics::{CACHE_HIT_TOKENS, CacheHitPoint, NON_CACHE_TOKENS};

/// Stacked bar chart of cached vs. uncached prompt tokens per bucket.
pub fn token_cache_chart(data: &[CacheHitPoint]) -> Value {
    json!({
        "type": "bar",
        "data": [{ "id": "tokenCacheData", "values": data }],
        "xField": "Time",
        "yField": "Value",
        "seriesField": "Type",
        "stack": true,
        "legends": stacked_legends(),
        "title": title("Token cache hits", String::new()),
        "bar": hover_outline(),
        "color": {
            "specified": {
                NON_CACHE_TOKENS: "#1890ff",
                CACHE_HIT_TOKENS: "#52c41a",
            },
        },
        "padding": CHART_PADDING,
        "axis": axes("Time", "Tokens"),
    })
}
