use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::{CHART_PADDING, axes, hover_outline, stacked_legends, title};
use crate::{analytics::ConsumptionPoint, render::QuotaFormatter};

/// Stacked bar chart of quota consumption per bucket and model.
///
/// Bars are plotted in currency units (`quota / quota_per_unit`, six
/// decimals) while the subtitle shows the formatted total.
pub fn consumption_chart(
    data: &[ConsumptionPoint],
    model_colors: &BTreeMap<String, String>,
    total_quota: f64,
    formatter: &QuotaFormatter,
) -> Value {
    let values: Vec<Value> = data
        .iter()
        .map(|point| {
            let usage = formatter
                .quota_with_unit(point.usage, 6)
                .parse::<f64>()
                .unwrap_or(0.0);
            json!({ "Time": point.time, "Model": point.model, "Usage": usage })
        })
        .collect();

    json!({
        "type": "bar",
        "data": [{ "id": "barData", "values": values }],
        "xField": "Time",
        "yField": "Usage",
        "seriesField": "Model",
        "stack": true,
        "legends": stacked_legends(),
        "title": title("Model consumption", format!("Total: {}", formatter.render_quota(total_quota, 2))),
        "bar": hover_outline(),
        "color": { "specified": model_colors },
        "padding": CHART_PADDING,
        "axis": axes("Time", "Consumption"),
    })
}
