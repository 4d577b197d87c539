//! Plugin settings and the persisted store configuration.

use crate::TeamGamesError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// TeamGames transaction claim endpoint.
pub const DEFAULT_API_URL: &str = "https://api.teamgames.io/api/v3/store/transaction/update";

/// Secret key written on first run, before an admin sets a real one.
pub const DEFAULT_SECRET_KEY: &str = "default-key";

/// Persisted plugin configuration.
///
/// Loaded once at startup and written back whenever the secret is rotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfiguration {
    /// Shared secret sent as `X-API-Key` on every claim.
    #[serde(rename = "StoreSecretKey", default = "default_secret_key")]
    pub store_secret_key: String,
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

impl Default for StoreConfiguration {
    fn default() -> Self {
        Self {
            store_secret_key: default_secret_key(),
        }
    }
}

/// Runtime settings supplied by the host when the plugin is constructed.
///
/// These are not persisted.
#[derive(Debug, Clone)]
pub struct PluginSettings {
    /// Claim endpoint URL.
    pub api_url: String,

    /// Optional request timeout. `None` keeps the HTTP client's default,
    /// which never times out.
    pub request_timeout: Option<Duration>,

    /// Refuse `teamgames.secret` from non-admin players.
    /// The console is always allowed.
    pub restrict_secret_to_admins: bool,

    /// Directory name used for the configuration file under the
    /// platform config directory.
    pub config_namespace: &'static str,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            restrict_secret_to_admins: false,
            config_namespace: "TeamGames",
        }
    }
}

impl PluginSettings {
    /// Validate settings for obvious errors.
    pub fn validate(&self) -> Result<(), TeamGamesError> {
        if self.api_url.is_empty() {
            return Err(TeamGamesError::ConfigError(
                "api_url cannot be empty".to_string(),
            ));
        }
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(TeamGamesError::ConfigError(format!(
                "api_url must be an http(s) URL, got {}",
                self.api_url
            )));
        }
        if self.config_namespace.is_empty() {
            return Err(TeamGamesError::ConfigError(
                "config_namespace cannot be empty".to_string(),
            ));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(TeamGamesError::ConfigError(
                "request_timeout must be non-zero when set".to_string(),
            ));
        }
        Ok(())
    }
}
