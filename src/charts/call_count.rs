use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::{CHART_PADDING, title};
use crate::{analytics::CallCountPoint, render::render_number};

/// Donut chart of call share per model.
pub fn call_count_chart(
    data: &[CallCountPoint],
    model_colors: &BTreeMap<String, String>,
    total_calls: i64,
) -> Value {
    json!({
        "type": "pie",
        "data": [{ "id": "id0", "values": data }],
        "outerRadius": 0.8,
        "innerRadius": 0.5,
        "padAngle": 0.6,
        "valueField": "value",
        "categoryField": "type",
        "pie": {
            "style": { "cornerRadius": 10 },
            "state": {
                "hover": { "outerRadius": 0.85, "stroke": "#000", "lineWidth": 1 },
                "selected": { "outerRadius": 0.85, "stroke": "#000", "lineWidth": 1 },
            },
        },
        "title": title("Model call share", format!("Total: {}", render_number(total_calls as f64))),
        "legends": {
            "visible": true,
            "orient": "left",
            "position": "top",
            "flipPage": true,
        },
        "label": { "visible": true },
        "color": { "specified": model_colors },
        "padding": CHART_PADDING,
    })
}
