use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::models::Granularity;

/// Quota display and time zone settings.
///
/// `quota_per_unit` and `display_in_currency` are the fallbacks used until the
/// backend's `/api/status` values have been synced into the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Quota units per one currency unit.
    #[serde(default = "default_quota_per_unit")]
    pub quota_per_unit: f64,

    /// Render quota amounts as `$x.xx` instead of raw numbers.
    #[serde(default = "default_true")]
    pub display_in_currency: bool,

    /// Offset from UTC used for bucket labels. Unset uses the local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,

    /// Granularity used when neither the command line nor the local store
    /// provides one.
    #[serde(default)]
    pub default_granularity: Granularity,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            quota_per_unit: default_quota_per_unit(),
            display_in_currency: true,
            utc_offset_minutes: None,
            default_granularity: Granularity::default(),
        }
    }
}

impl DisplayConfig {
    /// Time zone offset for bucket labels.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(offset_from_minutes)
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.quota_per_unit.is_finite() && self.quota_per_unit > 0.0) {
            return Err(ConfigError::Validation(
                "display.quota_per_unit must be a positive number".into(),
            ));
        }
        if let Some(minutes) = self.utc_offset_minutes
            && offset_from_minutes(minutes).is_none()
        {
            return Err(ConfigError::Validation(format!(
                "display.utc_offset_minutes {minutes} is out of range"
            )));
        }
        Ok(())
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

fn default_quota_per_unit() -> f64 {
    500_000.0
}

fn default_true() -> bool {
    true
}
