//! Application configuration, read from `config.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{AuthConfig, Session};
use crate::content::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
use crate::storage::FileStore;
use crate::sync::SyncConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to write config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Config directory not found")]
    ConfigDirNotFound,
}

/// Content API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub base_url: String,
    pub per_page: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the state document (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    pub content: ContentConfig,
    pub sync: SyncConfig,
    pub auth: AuthConfig,
    /// Present when signed in
    pub session: Option<Session>,
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join("hifdh").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write to `path`, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolve the data directory
    pub fn data_dir(&self) -> crate::storage::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_data_dir(),
        }
    }

    /// A session when sync is enabled and one is configured
    pub fn sync_session(&self) -> Option<Session> {
        if self.sync.enabled {
            self.session.clone()
        } else {
            None
        }
    }
}
