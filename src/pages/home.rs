use super::{CallToAction, Notification, cached_content, load_operator_content};
use crate::{
    local_store::{self, LocalStore},
    render::{PageContent, markdown_to_html},
    services::{ApiClient, ApiResult},
};

#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    /// Rendered notice, present only when it changed since the last visit.
    pub notice: Option<String>,
    pub content: PageContent,
    pub call_to_action: CallToAction,
    pub notifications: Vec<Notification>,
}

impl HomeView {
    /// What to show before the backend answers.
    pub fn cached(store: &LocalStore, logged_in: bool) -> Self {
        Self {
            notice: None,
            content: cached_content(store, local_store::HOME_PAGE_CONTENT),
            call_to_action: CallToAction::for_login_state(logged_in),
            notifications: Vec::new(),
        }
    }
}

/// Fetch the notice and home content together and update the cache.
pub async fn load_home(client: &ApiClient, store: &mut LocalStore, logged_in: bool) -> HomeView {
    let (notice, content) = tokio::join!(client.notice(), client.home_page_content());

    let mut notifications = Vec::new();
    let notice = new_notice(notice, store, &mut notifications);
    let content = load_operator_content(
        content,
        store,
        local_store::HOME_PAGE_CONTENT,
        "home_page_content",
        &mut notifications,
    );

    HomeView {
        notice,
        content,
        call_to_action: CallToAction::for_login_state(logged_in),
        notifications,
    }
}

fn new_notice(
    fetched: ApiResult<String>,
    store: &mut LocalStore,
    notifications: &mut Vec<Notification>,
) -> Option<String> {
    match fetched {
        Ok(notice) if notice.is_empty() || store.get(local_store::NOTICE) == Some(notice.as_str()) => None,
        Ok(notice) => {
            let html = markdown_to_html(&notice);
            store.set_or_warn(local_store::NOTICE, notice);
            Some(html)
        }
        Err(e) => {
            notifications.push(Notification::from_error("notice", &e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::config::BackendConfig;

    async fn mount(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&BackendConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_markdown_home_and_new_notice() {
        let server = MockServer::start().await;
        mount(&server, "/api/notice", json!({"success": true, "message": "", "data": "**maintenance**"})).await;
        mount(&server, "/api/home_page_content", json!({"success": true, "message": "", "data": "# Welcome"})).await;

        let mut store = LocalStore::in_memory();
        let view = load_home(&client_for(&server), &mut store, true).await;

        assert_eq!(view.notice.as_deref(), Some("<p><strong>maintenance</strong></p>\n"));
        assert_eq!(view.content, PageContent::Html("<h1>Welcome</h1>\n".into()));
        assert_eq!(view.call_to_action.path, "/token");
        assert!(view.notifications.is_empty());
        assert_eq!(store.get(local_store::NOTICE), Some("**maintenance**"));
        assert_eq!(store.get(local_store::HOME_PAGE_CONTENT), Some("<h1>Welcome</h1>\n"));

        // Same notice again is not shown twice
        let view = load_home(&client_for(&server), &mut store, true).await;
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn test_embed_url_is_kept_verbatim() {
        let server = MockServer::start().await;
        mount(&server, "/api/notice", json!({"success": true, "message": "", "data": ""})).await;
        mount(
            &server,
            "/api/home_page_content",
            json!({"success": true, "message": "", "data": "https://example.com/landing"}),
        )
        .await;

        let mut store = LocalStore::in_memory();
        let view = load_home(&client_for(&server), &mut store, false).await;

        assert!(view.notice.is_none());
        assert_eq!(view.content, PageContent::Embed("https://example.com/landing".into()));
        assert_eq!(view.call_to_action.path, "/register");
        assert_eq!(
            HomeView::cached(&store, false).content,
            PageContent::Embed("https://example.com/landing".into())
        );
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_built_in_page() {
        let server = MockServer::start().await;
        mount(&server, "/api/notice", json!({"success": false, "message": "notice unavailable"})).await;
        mount(&server, "/api/home_page_content", json!({"success": false, "message": "database error"})).await;

        let mut store = LocalStore::in_memory();
        store.set(local_store::HOME_PAGE_CONTENT, "<p>old</p>").unwrap();
        let view = load_home(&client_for(&server), &mut store, false).await;

        assert!(view.content.is_default());
        assert_eq!(view.notifications.len(), 2);
        assert_eq!(view.notifications[1].message, "database error");
        assert_eq!(store.get(local_store::HOME_PAGE_CONTENT), Some("<p>old</p>"));
    }

    #[tokio::test]
    async fn test_empty_content_is_default_page() {
        let server = MockServer::start().await;
        mount(&server, "/api/notice", json!({"success": true, "message": "", "data": ""})).await;
        mount(&server, "/api/home_page_content", json!({"success": true, "message": "", "data": ""})).await;

        let mut store = LocalStore::in_memory();
        let view = load_home(&client_for(&server), &mut store, false).await;
        assert!(view.content.is_default());
    }
}
