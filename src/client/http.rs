//! Reqwest-based async HTTP client for the TeamGames store API.
//!
//! Only the transport lives here. Interpreting the body is the job of
//! [`crate::claim`].

use crate::config::PluginSettings;
use crate::TeamGamesError;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Header carrying the store secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A completed HTTP exchange with a 2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body as text.
    pub body: String,
}

/// Store API client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ClaimClient {
    client: Client,
    url: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl ClaimClient {
    /// Create a new client from settings.
    pub fn new(settings: &PluginSettings) -> Result<Self, TeamGamesError> {
        let client = build_client(settings.request_timeout)?;

        Ok(Self {
            client,
            url: settings.api_url.clone(),
            user_agent: build_user_agent(),
            timeout: settings.request_timeout,
        })
    }

    /// POST a claim payload.
    ///
    /// Connection failures and non-2xx statuses are errors. Any 2xx status is
    /// returned as-is together with its body; callers decide what a non-200
    /// success means.
    pub async fn send_claim(
        &self,
        payload: String,
        api_key: &str,
    ) -> Result<ClaimResponse, TeamGamesError> {
        let response = self
            .client
            .post(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .body(payload)
            .send()
            .await
            .map_err(|e| TeamGamesError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TeamGamesError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TeamGamesError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(ClaimResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn build_client(timeout: Option<Duration>) -> Result<Client, TeamGamesError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| TeamGamesError::Transport(format!("Failed to create client: {}", e)))
}

/// Build the User-Agent string, `teamgames-plugin/<version>`.
pub fn build_user_agent() -> String {
    format!("teamgames-plugin/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent();
        assert_eq!(
            ua,
            format!("teamgames-plugin/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ClaimClient::new(&PluginSettings::default()).unwrap();
        assert_eq!(client.url(), crate::config::DEFAULT_API_URL);
        assert!(client.timeout().is_none());
    }

    #[test]
    fn test_client_with_timeout() {
        let settings = PluginSettings {
            request_timeout: Some(Duration::from_secs(10)),
            ..PluginSettings::default()
        };
        let client = ClaimClient::new(&settings).unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = PluginSettings {
            api_url: format!("http://{}/api/v3/store/transaction/update", addr),
            ..PluginSettings::default()
        };
        let client = ClaimClient::new(&settings).unwrap();
        let result = client
            .send_claim(r#"{"playerName":"1"}"#.to_string(), "key")
            .await;

        assert!(matches!(result, Err(TeamGamesError::Transport(_))));
    }
}
