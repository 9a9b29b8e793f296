//! Configuration module for the dashboard client.
//!
//! The client is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [backend]
//! base_url = "https://api.example.com"
//! access_token = "${HARBOR_ACCESS_TOKEN}"
//! user_id = 1
//! admin = true
//!
//! [display]
//! quota_per_unit = 500000
//! display_in_currency = true
//! ```

mod backend;
mod display;
mod observability;
mod storage;

use std::path::{Path, PathBuf};

pub use backend::*;
pub use display::*;
pub use observability::*;
use serde::{Deserialize, Serialize};
pub use storage::*;

/// Root configuration for the dashboard client.
///
/// All sections are optional with sensible defaults; an empty file points the
/// client at a backend on localhost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Backend API connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Quota display and time zone settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Local store location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: DashboardConfig = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or from the default location if it exists,
    /// falling back to defaults otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading config from default location");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.display.validate()?;
        Ok(())
    }
}

/// Default config file location (`<config_dir>/harbor-dashboard/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("harbor-dashboard").join("config.toml"))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand `${VAR}` references, ignoring anything after a `#` comment marker.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    static ENV_VAR: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
        regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid")
    });
    let mut result = String::with_capacity(input.len());

    for line in input.lines() {
        let comment_pos = line.find('#');
        let mut last_end = 0;

        for cap in ENV_VAR.captures_iter(line) {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            if let Some(pos) = comment_pos
                && whole.start() >= pos
            {
                continue;
            }

            result.push_str(&line[last_end..whole.start()]);
            let var_name = &cap[1];
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            result.push_str(&value);
            last_end = whole.end();
        }

        result.push_str(&line[last_end..]);
        result.push('\n');
    }

    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    Ok(result)
}

/// Starter config written by `harbor-dashboard init`.
pub fn default_config_toml() -> &'static str {
    r#"# Harbor dashboard configuration

[backend]
base_url = "http://127.0.0.1:3000"
# access_token = "${HARBOR_ACCESS_TOKEN}"
# user_id = 1
# admin = false
# timeout_secs = 30

[display]
quota_per_unit = 500000
display_in_currency = true
# utc_offset_minutes = 480

[observability.logging]
level = "info"
format = "compact"
"#
}
