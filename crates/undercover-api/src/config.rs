//! Client configuration.
//!
//! Resolution order: `~/.config/undercover/config.toml`, then environment
//! variables, then built-in defaults. A missing file is not an error; a
//! file that exists but does not parse is, so a typo never silently
//! reverts the player to the public backend.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use undercover_core::error::{GameError, Result};

/// The public backend this client was written against.
pub const DEFAULT_BASE_URL: &str = "https://spyback.onrender.com/api";

/// Environment override for the backend base URL.
pub const BASE_URL_ENV: &str = "UNDERCOVER_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SPEAKING_SECS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Discussion time per player, in seconds.
    #[serde(default = "default_speaking_secs")]
    pub speaking_secs: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_speaking_secs() -> u32 {
    DEFAULT_SPEAKING_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            speaking_secs: default_speaking_secs(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the user config directory, applying the
    /// environment override on top.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        Ok(config)
    }

    /// Loads from an explicit path; a missing file yields the defaults.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: ClientConfig = toml::from_str(&content)
            .map_err(|e| GameError::invalid_data(format!("config file: {e}")))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// `~/.config/undercover/config.toml` (platform equivalent via dirs).
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("undercover").join("config.toml"))
    }
}
