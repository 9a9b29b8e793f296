//! Platform backend REST client.
//!
//! Every endpoint answers with a `{success, message, data}` envelope;
//! `success = false` is the only application-level error signal.

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::BackendConfig,
    models::{CacheHitRecord, Granularity, StatusInfo, UsageRecord, UserProfile},
};

/// Header carrying the id of the user an access token belongs to.
pub const USER_ID_HEADER: &str = "new-api-user";

/// Error type for backend client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}")]
    Http { status: reqwest::StatusCode },

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Whether the failure was reported by the application rather than the
    /// transport.
    pub fn is_application_error(&self) -> bool {
        matches!(self, ApiError::Api(_))
    }
}

/// Result type for backend client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<T>,
}

impl<T: Default> Envelope<T> {
    fn into_result(self) -> ApiResult<T> {
        if !self.success {
            let message = if self.message.is_empty() {
                "request failed".to_string()
            } else {
                self.message
            };
            return Err(ApiError::Api(message));
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// Whose usage a data query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageScope {
    /// The signed-in user (`/api/data/self/`).
    Own,
    /// All users, optionally narrowed to one username (`/api/data/`).
    Admin { username: Option<String> },
}

/// Parameters shared by the usage and cache-hit queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageQuery {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub granularity: Granularity,
    pub username: Option<String>,
    pub model_name: Option<String>,
}

impl UsageQuery {
    fn base_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_timestamp", self.start_timestamp.to_string()),
            ("end_timestamp", self.end_timestamp.to_string()),
            ("default_time", self.granularity.as_str().to_string()),
        ]
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Client for the platform backend.
///
/// # Example
/// ```ignore
/// let client = ApiClient::new(&config.backend)?;
/// let profile = client.user_self().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from backend settings, installing auth headers.
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidConfig(format!("access token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(user_id) = config.user_id {
            headers.insert(
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from(user_id),
            );
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("harbor-dashboard/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T>(&self, path: &str, params: &[(&str, String)]) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, params = ?params, "Backend request");

        let response = self.http_client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Backend returned error status");
            return Err(ApiError::Http { status });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{path}: {e}")))?;

        envelope.into_result().inspect_err(|e| {
            tracing::warn!(path, error = %e, "Backend reported failure");
        })
    }

    /// Pre-aggregated usage rows for the query window.
    pub async fn usage_data(&self, scope: &UsageScope, query: &UsageQuery) -> ApiResult<Vec<UsageRecord>> {
        let mut params = query.base_params();
        let path = match scope {
            UsageScope::Own => "/api/data/self/",
            UsageScope::Admin { username } => {
                params.push(("username", username.clone().unwrap_or_default()));
                "/api/data/"
            }
        };
        self.get(path, &params).await
    }

    /// Prompt-cache hit statistics per bucket.
    pub async fn token_cache_hits(&self, query: &UsageQuery) -> ApiResult<Vec<CacheHitRecord>> {
        let mut params = query.base_params();
        if let Some(username) = non_empty(&query.username) {
            params.push(("username", username.to_string()));
        }
        if let Some(model_name) = non_empty(&query.model_name) {
            params.push(("model_name", model_name.to_string()));
        }
        self.get("/api/log/token/cache/hit", &params).await
    }

    pub async fn user_self(&self) -> ApiResult<UserProfile> {
        self.get("/api/user/self", &[]).await
    }

    pub async fn status(&self) -> ApiResult<StatusInfo> {
        self.get("/api/status", &[]).await
    }

    /// Site-wide notice, as markdown. Empty when none is set.
    pub async fn notice(&self) -> ApiResult<String> {
        self.get("/api/notice", &[]).await
    }

    /// Operator home page: markdown, or an `https://` URL to embed.
    pub async fn home_page_content(&self) -> ApiResult<String> {
        self.get("/api/home_page_content", &[]).await
    }

    /// Operator about page: markdown, or an `https://` URL to embed.
    pub async fn about(&self) -> ApiResult<String> {
        self.get("/api/about", &[]).await
    }
}
