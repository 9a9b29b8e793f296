//! Persistent key/value cache for display state.
//!
//! Holds the last-seen footer HTML, home/about content, notice and display
//! preferences so a view can render immediately before the backend answers.
//! Nothing here is authoritative; a missing or corrupt file is an empty store.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub const FOOTER_HTML: &str = "footer_html";
pub const HOME_PAGE_CONTENT: &str = "home_page_content";
pub const ABOUT: &str = "about";
pub const NOTICE: &str = "notice";
pub const SYSTEM_NAME: &str = "system_name";
pub const QUOTA_PER_UNIT: &str = "quota_per_unit";
pub const DISPLAY_IN_CURRENCY: &str = "display_in_currency";
pub const DATA_EXPORT_DEFAULT_TIME: &str = "data_export_default_time";

/// Errors from persisting the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write local store {1}: {0}")]
    Io(std::io::Error, PathBuf),

    #[error("Failed to serialize local store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value store backed by a JSON file, or purely in memory.
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`, starting empty if the file is missing or
    /// unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Local store is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read local store, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a value and persist the store.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Remove a value and persist the store.
    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// Set a value, logging instead of failing when the file can't be written.
    ///
    /// The cache only shortens time-to-first-render, so a failed write must
    /// not abort a page load.
    pub fn set_or_warn(&mut self, key: &str, value: impl Into<String>) {
        if let Err(e) = self.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist local store entry");
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e, parent.to_path_buf()))?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, contents).map_err(|e| StoreError::Io(e, path.clone()))
    }
}
