//! Client configuration.

use crate::error::{DealError, DealErrorKind};
use derive_getters::Getters;
use derive_setters::Setters;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Game root used when nothing else is configured.
pub const DEFAULT_ROOT_URL: &str = "http://localhost:8080/lets-make-a-deal/games";

/// Configuration for one client run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// The only URL the client knows up front; games are created here.
    #[serde(default = "default_root_url")]
    #[setters(into)]
    root_url: String,

    /// Upper bound on a whole request, response body included.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Upper bound on establishing a connection.
    #[serde(default = "default_connect_timeout_secs")]
    connect_timeout_secs: u64,

    /// How many out-of-range door indices the operator may enter per turn.
    #[serde(default = "default_max_selection_attempts")]
    max_selection_attempts: u32,

    /// Print the game's transition history after the final snapshot.
    #[serde(default)]
    show_history: bool,

    /// Sent with every request.
    #[serde(default = "default_user_agent")]
    #[setters(into)]
    user_agent: String,
}

fn default_root_url() -> String {
    DEFAULT_ROOT_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_selection_attempts() -> u32 {
    3
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_selection_attempts: default_max_selection_attempts(),
            show_history: false,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DealError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DealError::new(DealErrorKind::Config {
                message: format!("failed to read {}: {}", path.as_ref().display(), e),
            })
        })?;

        let config = Self::from_toml(&content)?;
        info!(root_url = %config.root_url, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, DealError> {
        toml::from_str(content).map_err(|e| {
            DealError::new(DealErrorKind::Config {
                message: format!("failed to parse config: {}", e),
            })
        })
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, DealError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// The game root as a parsed URL.
    pub fn root(&self) -> Result<Url, DealError> {
        Url::parse(&self.root_url).map_err(|e| {
            DealError::new(DealErrorKind::Config {
                message: format!("invalid root URL '{}': {}", self.root_url, e),
            })
        })
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
