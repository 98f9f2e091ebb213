// ABOUTME: Client configuration loaded from ~/.bridge-client/config.toml
// Every field is optional in the file; command-line flags override the endpoint

use crate::bridge::{BridgeError, DEFAULT_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".bridge-client";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint of the terminal bridge
    pub url: String,
    /// Where log files go; `~/.bridge-client/logs` when unset
    pub log_dir: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            log_dir: None,
            log_filter: "bridge_client=info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn app_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(APP_DIR))
    }

    pub fn default_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }

    /// Load the default config file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self, BridgeError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicit config file; a missing file is an error here
    pub fn load_from(path: &Path) -> Result<Self, BridgeError> {
        let text = std::fs::read_to_string(path).map_err(|source| BridgeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| BridgeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        self
    }

    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| Self::app_dir().join("logs"))
    }
}
