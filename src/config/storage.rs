use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the JSON store file.
    /// Defaults to `<data_dir>/harbor-dashboard/local_storage.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolved store path, if one can be determined.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("harbor-dashboard").join("local_storage.json"))
        })
    }
}
