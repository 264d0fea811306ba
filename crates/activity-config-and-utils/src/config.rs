//! Configuration for the activity client and the token relay.
//!
//! Only public values live here. The client secret is read by the relay
//! straight from its environment and never becomes part of [`Config`].

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Public OAuth client identifier (can be baked in at compile time via ACTIVITY_CLIENT_ID).
pub const DEFAULT_CLIENT_ID: &str = match option_env!("ACTIVITY_CLIENT_ID") {
    Some(id) => id,
    None => "",
};

/// Base URL the client posts authorization codes to.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Identity provider token endpoint the relay forwards to.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://discord.com/api/oauth2/token";

/// Address the relay listens on.
pub const DEFAULT_RELAY_BIND: &str = "127.0.0.1:3000";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Public OAuth client identifier shared by the host and the relay.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Base URL of the token relay.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    /// Identity provider token endpoint.
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    /// Listen address for the relay server.
    #[serde(default = "default_relay_bind")]
    pub relay_bind: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

fn default_relay_bind() -> String {
    DEFAULT_RELAY_BIND.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            client_id: default_client_id(),
            relay_url: default_relay_url(),
            token_endpoint: default_token_endpoint(),
            relay_bind: default_relay_bind(),
        }
    }
}

impl Config {
    /// Load from the config file when present, then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `ACTIVITY_*` overrides using `lookup` to read variables.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = read("ACTIVITY_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(client_id) = read("ACTIVITY_CLIENT_ID") {
            self.client_id = client_id;
        }
        if let Some(relay_url) = read("ACTIVITY_RELAY_URL") {
            self.relay_url = relay_url;
        }
        if let Some(endpoint) = read("ACTIVITY_TOKEN_ENDPOINT") {
            self.token_endpoint = endpoint;
        }
        if let Some(bind) = read("ACTIVITY_RELAY_BIND") {
            self.relay_bind = bind;
        }
    }

    /// Fail when a value needed to talk to the host or the provider is missing.
    pub fn validate(&self) -> CoreResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(CoreError::Config(
                "client_id is not set (ACTIVITY_CLIENT_ID)".to_string(),
            ));
        }
        self.relay_url()?;
        self.token_endpoint()?;
        Ok(())
    }

    /// The relay base URL, parsed.
    pub fn relay_url(&self) -> CoreResult<Url> {
        Url::parse(&self.relay_url).map_err(CoreError::from)
    }

    /// The provider token endpoint, parsed.
    pub fn token_endpoint(&self) -> CoreResult<Url> {
        Url::parse(&self.token_endpoint).map_err(CoreError::from)
    }
}
