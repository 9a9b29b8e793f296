//! Chart adapters.
//!
//! Each adapter turns a series into a VChart configuration object. The
//! objects are plain JSON so any front-end (or a file on disk) can render them.

mod call_count;
mod consumption;
mod token_cache;

pub use call_count::*;
pub use consumption::*;
use serde_json::{Value, json};
pub use token_cache::*;

/// Padding shared by every chart: top, right, bottom, left.
const CHART_PADDING: [u32; 4] = [40, 20, 60, 60];

fn title(text: &str, subtext: String) -> Value {
    json!({
        "visible": true,
        "text": text,
        "subtext": subtext,
        "alignTo": "left",
    })
}

fn stacked_legends() -> Value {
    json!({
        "visible": true,
        "selectMode": "single",
        "position": "top",
        "flipPage": true,
    })
}

fn hover_outline() -> Value {
    json!({
        "state": {
            "hover": { "stroke": "#000", "lineWidth": 1 },
        },
    })
}

fn axes(x_title: &str, y_title: &str) -> Value {
    json!({
        "x": { "title": { "text": x_title, "visible": true } },
        "y": { "title": { "text": y_title, "visible": true } },
    })
}
