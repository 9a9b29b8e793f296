use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Backend API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the platform backend (scheme + host, optional path prefix).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// System access token, sent as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub access_token: Option<String>,

    /// User id the access token belongs to, sent as `New-Api-User`.
    #[serde(default)]
    pub user_id: Option<i64>,

    /// Query the admin usage endpoints (`/api/data/`) instead of the
    /// self-service ones (`/api/data/self/`).
    #[serde(default)]
    pub admin: bool,

    /// Per-request timeout. Unset means requests never time out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            user_id: None,
            admin: false,
            timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("backend.base_url '{}' is invalid: {e}", self.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "backend.base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "backend.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
