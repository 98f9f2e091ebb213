// ABOUTME: Error types for the terminal bridge client
// Covers connection setup, local send rejection and configuration loading

use std::path::PathBuf;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("Not connected to server")]
    NotConnected,

    #[error("failed to encode message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("connection writer has shut down")]
    ChannelClosed,

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
