//! Configuration for the bot API client.

use std::env;

use console_core::DirectoryKind;

/// Configuration for connecting to the Herald bot API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the bot HTTP server (e.g., "http://127.0.0.1:5454").
    pub base_url: String,
    /// Bearer token for authenticated deployments.
    pub api_token: Option<String>,
}

impl GatewayConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
        }
    }

    /// Create a configuration with a bearer token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: Some(token.into()),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `HERALD_API_URL` | Bot API base URL | `http://127.0.0.1:5454` |
    /// | `HERALD_API_TOKEN` | Bearer token | (none) |
    pub fn from_env() -> Self {
        let base_url =
            env::var("HERALD_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5454".to_string());
        let api_token = env::var("HERALD_API_TOKEN").ok();
        Self {
            base_url,
            api_token,
        }
    }

    /// Endpoint for one directory's record list.
    pub fn directory_url(&self, kind: DirectoryKind) -> String {
        format!("{}/api/v1/directory/{}", self.base_url, kind.cache_key())
    }

    /// Endpoint for a guild's channel list.
    pub fn channels_url(&self, guild_id: &str) -> String {
        format!(
            "{}/api/v1/guilds/{}/channels",
            self.base_url,
            urlencoding::encode(guild_id)
        )
    }

    /// Endpoint for the mapping collection.
    pub fn mappings_url(&self) -> String {
        format!("{}/api/v1/mappings", self.base_url)
    }

    /// Endpoint for one mapping, keyed by its primary id.
    pub fn mapping_url(&self, primary_id: &str) -> String {
        format!(
            "{}/api/v1/mappings/{}",
            self.base_url,
            urlencoding::encode(primary_id)
        )
    }

    /// Endpoint for the media server's library list.
    pub fn libraries_url(&self) -> String {
        format!("{}/api/v1/libraries", self.base_url)
    }

    /// Endpoint for the configuration document.
    pub fn config_url(&self) -> String {
        format!("{}/api/v1/config", self.base_url)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5454")
    }
}
