use super::{ApiClient, ApiResult};
use crate::{
    local_store::{self, LocalStore},
    models::StatusInfo,
};

/// Fetch `/api/status` and cache the display-relevant fields.
///
/// Values the backend omits are left untouched in the store; an empty footer
/// clears the cached one so the default footer shows again.
pub async fn sync_status(client: &ApiClient, store: &mut LocalStore) -> ApiResult<StatusInfo> {
    let status = client.status().await?;
    apply_status(&status, store);
    Ok(status)
}

pub(crate) fn apply_status(status: &StatusInfo, store: &mut LocalStore) {
    if let Some(system_name) = &status.system_name {
        store.set_or_warn(local_store::SYSTEM_NAME, system_name.as_str());
    }
    match status.footer_html.as_deref() {
        Some("") => {
            if let Err(e) = store.remove(local_store::FOOTER_HTML) {
                tracing::warn!(error = %e, "Failed to clear cached footer");
            }
        }
        Some(html) => store.set_or_warn(local_store::FOOTER_HTML, html),
        None => {}
    }
    if let Some(per_unit) = status.quota_per_unit {
        store.set_or_warn(local_store::QUOTA_PER_UNIT, per_unit.to_string());
    }
    if let Some(in_currency) = status.display_in_currency {
        store.set_or_warn(local_store::DISPLAY_IN_CURRENCY, in_currency.to_string());
    }
    tracing::debug!(system_name = ?status.system_name, "Synced site status");
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::{config::BackendConfig, render::QuotaFormatter};

    #[tokio::test]
    async fn test_sync_status_populates_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "",
                "data": {
                    "system_name": "Harbor",
                    "footer_html": "<p>Powered by Harbor</p>",
                    "quota_per_unit": 1000,
                    "display_in_currency": false,
                    "version": "v0.3.0",
                    "unrelated_setting": 5
                }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&BackendConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();
        let mut store = LocalStore::in_memory();
        let status = sync_status(&client, &mut store).await.unwrap();

        assert_eq!(status.version.as_deref(), Some("v0.3.0"));
        assert_eq!(store.get(local_store::SYSTEM_NAME), Some("Harbor"));
        assert_eq!(store.get(local_store::FOOTER_HTML), Some("<p>Powered by Harbor</p>"));

        let formatter = QuotaFormatter::default().with_store_overrides(&store);
        assert_eq!(formatter.quota_per_unit, 1000.0);
        assert!(!formatter.display_in_currency);
    }

    #[test]
    fn test_empty_footer_clears_cache() {
        let mut store = LocalStore::in_memory();
        store.set(local_store::FOOTER_HTML, "old").unwrap();
        apply_status(
            &StatusInfo {
                footer_html: Some(String::new()),
                ..Default::default()
            },
            &mut store,
        );
        assert_eq!(store.get(local_store::FOOTER_HTML), None);
    }
}
