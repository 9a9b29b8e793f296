use crate::{
    config::DisplayConfig,
    local_store::{self, LocalStore},
};

/// Abbreviate large counts: `12.3k`, `4.5M`, `1.2B`.
///
/// Values below ten thousand are printed unchanged.
pub fn render_number(num: f64) -> String {
    if num >= 1_000_000_000.0 {
        format!("{:.1}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 10_000.0 {
        format!("{:.1}k", num / 1_000.0)
    } else {
        format!("{num}")
    }
}

/// Converts raw quota units into display strings.
///
/// Settings come from the config file, overridden by whatever the backend
/// last published through `/api/status` (see [`QuotaFormatter::with_store_overrides`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaFormatter {
    pub quota_per_unit: f64,
    pub display_in_currency: bool,
}

impl Default for QuotaFormatter {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

impl QuotaFormatter {
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self {
            quota_per_unit: display.quota_per_unit,
            display_in_currency: display.display_in_currency,
        }
    }

    /// Apply backend-published settings cached in the local store.
    pub fn with_store_overrides(mut self, store: &LocalStore) -> Self {
        if let Some(per_unit) = store
            .get(local_store::QUOTA_PER_UNIT)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
        {
            self.quota_per_unit = per_unit;
        }
        if let Some(in_currency) = store
            .get(local_store::DISPLAY_IN_CURRENCY)
            .and_then(|v| v.parse::<bool>().ok())
        {
            self.display_in_currency = in_currency;
        }
        self
    }

    /// `$x.xx` in currency mode, otherwise the abbreviated raw number.
    ///
    /// A positive quota never renders as zero dollars; it shows the smallest
    /// amount representable with `digits` decimals instead.
    pub fn render_quota(&self, quota: f64, digits: usize) -> String {
        if !self.display_in_currency {
            return render_number(quota);
        }

        let amount = quota / self.quota_per_unit;
        let fixed = format!("{amount:.digits$}");
        if quota > 0.0 && amount > 0.0 && fixed.parse::<f64>().is_ok_and(|v| v == 0.0) {
            let min_value = 10f64.powi(-(digits as i32));
            return format!("${min_value:.digits$}");
        }
        format!("${fixed}")
    }

    /// Quota converted to currency units, fixed to `digits` decimals.
    pub fn quota_with_unit(&self, quota: f64, digits: usize) -> String {
        format!("{:.digits$}", quota / self.quota_per_unit)
    }

    /// Format an amount already in currency units.
    pub fn render_quota_number_with_digit(&self, num: f64, digits: usize) -> String {
        if self.display_in_currency {
            format!("${num:.digits$}")
        } else {
            format!("{num:.digits$}")
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, "0")]
    #[case(9_999.0, "9999")]
    #[case(12.5, "12.5")]
    #[case(10_000.0, "10.0k")]
    #[case(123_456.0, "123.5k")]
    #[case(2_500_000.0, "2.5M")]
    #[case(3_000_000_000.0, "3.0B")]
    fn test_render_number(#[case] num: f64, #[case] expected: &str) {
        assert_eq!(render_number(num), expected);
    }

    #[test]
    fn test_render_quota_currency() {
        let formatter = QuotaFormatter::default();
        assert_eq!(formatter.render_quota(500_000.0, 2), "$1.00");
        assert_eq!(formatter.render_quota(1_250_000.0, 2), "$2.50");
        assert_eq!(formatter.render_quota(0.0, 2), "$0.00");
    }

    #[test]
    fn test_render_quota_tiny_positive_shows_minimum() {
        let formatter = QuotaFormatter::default();
        assert_eq!(formatter.render_quota(10.0, 2), "$0.01");
        assert_eq!(formatter.render_quota(10.0, 4), "$0.0001");
    }

    #[test]
    fn test_render_quota_raw_mode() {
        let formatter = QuotaFormatter {
            quota_per_unit: 500_000.0,
            display_in_currency: false,
        };
        assert_eq!(formatter.render_quota(123_456.0, 2), "123.5k");
        assert_eq!(formatter.render_quota_number_with_digit(1.23456, 4), "1.2346");
    }

    #[test]
    fn test_quota_with_unit() {
        let formatter = QuotaFormatter::default();
        assert_eq!(formatter.quota_with_unit(250_000.0, 6), "0.500000");
        assert_eq!(formatter.render_quota_number_with_digit(0.5, 4), "$0.5000");
    }

    #[test]
    fn test_store_overrides() {
        let mut store = LocalStore::in_memory();
        store.set(local_store::QUOTA_PER_UNIT, "1000").unwrap();
        store.set(local_store::DISPLAY_IN_CURRENCY, "false").unwrap();

        let formatter = QuotaFormatter::default().with_store_overrides(&store);
        assert_eq!(formatter.quota_per_unit, 1000.0);
        assert!(!formatter.display_in_currency);
    }

    #[test]
    fn test_store_overrides_ignore_invalid_values() {
        let mut store = LocalStore::in_memory();
        store.set(local_store::QUOTA_PER_UNIT, "0").unwrap();
        store.set(local_store::DISPLAY_IN_CURRENCY, "maybe").unwrap();

        let formatter = QuotaFormatter::default().with_store_overrides(&store);
        assert_eq!(formatter, QuotaFormatter::default());
    }
}
