use crate::local_store::{self, LocalStore};

pub const PROJECT_NAME: &str = "Harbor-API";
pub const PROJECT_URL: &str = "https://github.com/gtxy27/Harbor-API";
pub const AUTHOR: &str = "gtxy27";
pub const AUTHOR_URL: &str = "https://github.com/gtxy27";
pub const UPSTREAM_NAME: &str = "New-API";
pub const UPSTREAM_URL: &str = "https://github.com/songquanpeng/new-api";

/// Site footer: operator HTML synced from `/api/status`, or the default credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    Custom(String),
    Default { version: &'static str },
}

impl Footer {
    pub fn from_store(store: &LocalStore) -> Self {
        match store.get(local_store::FOOTER_HTML) {
            Some(html) if !html.is_empty() => Footer::Custom(html.to_string()),
            _ => Footer::Default {
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Footer::Custom(html) => html.clone(),
            Footer::Default { version } => format!(
                "<div class=\"custom-footer\"><a href=\"{PROJECT_URL}\" target=\"_blank\" rel=\"noreferrer\">{PROJECT_NAME} {version}</a> \
                 by <a href=\"{AUTHOR_URL}\" target=\"_blank\" rel=\"noreferrer\">{AUTHOR}</a>, \
                 based on <a href=\"{UPSTREAM_URL}\" target=\"_blank\" rel=\"noreferrer\">{UPSTREAM_NAME}</a></div>"
            ),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Footer::Custom(html) => html.clone(),
            Footer::Default { version } => {
                format!("{PROJECT_NAME} {version} by {AUTHOR}, based on {UPSTREAM_NAME}")
            }
        }
    }
}
