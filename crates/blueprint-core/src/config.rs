use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::{FileBackend, STORAGE_KEY};

/// Store configuration.
///
/// Everything defaults; a config file is optional and absent in most
/// deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key the snapshot is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Overrides the platform data directory used by the file backend.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            data_dir: None,
        }
    }
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

impl StoreConfig {
    /// Root directory for file-backed persistence: the configured override,
    /// else the platform default.
    #[must_use]
    pub fn data_root(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(FileBackend::default_root)
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<StoreConfig> {
    if !path.exists() {
        return Ok(StoreConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<StoreConfig>(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}
