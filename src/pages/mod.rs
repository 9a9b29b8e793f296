//! Page controllers.
//!
//! Each page owns the state a view needs and talks to the backend through an
//! [`ApiClient`](crate::services::ApiClient). Failures never abort a page;
//! they are logged and collected as [`Notification`]s for the caller to show.

mod about;
mod detail;
mod footer;
mod home;
mod landing;

pub use about::*;
pub use detail::*;
pub use footer::*;
pub use home::*;
pub use landing::*;
use serde::Serialize;

use crate::{
    local_store::LocalStore,
    render::{PageContent, resolve_content},
    services::{ApiError, ApiResult},
};

/// A failed backend call, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// The call that failed, e.g. `usage_data`.
    pub operation: String,
    pub message: String,
}

impl Notification {
    /// Log a failed backend call and wrap it for display.
    pub fn from_error(operation: &str, error: &ApiError) -> Self {
        tracing::error!(operation, error = %error, "Backend call failed");
        Self {
            operation: operation.to_string(),
            message: error.to_string(),
        }
    }
}

/// Resolve fetched operator content and keep the cache in step.
///
/// Success stores the resolved form under `key`; failure yields the built-in
/// page and a notification, leaving the cache as it was.
fn load_operator_content(
    fetched: ApiResult<String>,
    store: &mut LocalStore,
    key: &str,
    operation: &str,
    notifications: &mut Vec<Notification>,
) -> PageContent {
    match fetched {
        Ok(raw) => {
            let resolved = resolve_content(&raw);
            store.set_or_warn(key, resolved.as_str());
            PageContent::from_resolved(resolved)
        }
        Err(e) => {
            notifications.push(Notification::from_error(operation, &e));
            PageContent::Default
        }
    }
}

/// Content last cached under `key`, for rendering before the fetch returns.
fn cached_content(store: &LocalStore, key: &str) -> PageContent {
    PageContent::from_resolved(store.get(key).unwrap_or_default().to_string())
}
