use serde::{Deserialize, Serialize};

/// Public site settings from `/api/status`.
///
/// Only the fields the dashboard consumes are modelled; everything is
/// optional because older backends omit some of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(default)]
    pub system_name: Option<String>,
    #[serde(default)]
    pub footer_html: Option<String>,
    #[serde(default)]
    pub quota_per_unit: Option<f64>,
    #[serde(default)]
    pub display_in_currency: Option<bool>,
    #[serde(default)]
    pub version: Option<String>,
}
