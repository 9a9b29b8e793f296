use super::{Notification, cached_content, load_operator_content};
use crate::{
    local_store::{self, LocalStore},
    render::PageContent,
    services::ApiClient,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AboutView {
    pub content: PageContent,
    pub notifications: Vec<Notification>,
}

impl AboutView {
    pub fn cached(store: &LocalStore) -> Self {
        Self {
            content: cached_content(store, local_store::ABOUT),
            notifications: Vec::new(),
        }
    }
}

pub async fn load_about(client: &ApiClient, store: &mut LocalStore) -> AboutView {
    let mut notifications = Vec::new();
    let content = load_operator_content(
        client.about().await,
        store,
        local_store::ABOUT,
        "about",
        &mut notifications,
    );
    AboutView {
        content,
        notifications,
    }
}
