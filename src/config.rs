//! Runtime configuration loaded from an optional YAML file.
//!
//! Every key is optional; anything missing falls back to [`Config::default`].
//!
//! ```yaml
//! user_agent: "Mozilla/5.0 ..."
//! accept_language: "ja,en-US;q=0.7,en;q=0.3"
//! request_timeout_secs: 30
//! cache_ttl_secs: 3600
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_DETAIL_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.7,en;q=0.3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-agent for listing pages.
    pub user_agent: String,
    /// User-agent for article pages.
    pub detail_user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub request_timeout_secs: u64,
    /// How long a fetched article stays memoized.
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            detail_user_agent: DEFAULT_DETAIL_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            request_timeout_secs: 30,
            cache_ttl_secs: 3600,
        }
    }
}

impl Config {
    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    /// Load configuration from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml(&text, path)?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
