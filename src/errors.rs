//! TeamGames error types.

use thiserror::Error;

/// Errors that can occur while running the claim plugin.
#[derive(Debug, Error)]
pub enum TeamGamesError {
    /// Plugin settings are invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading or writing the persisted configuration failed.
    #[error("Configuration I/O error: {0}")]
    ConfigIO(String),

    /// Connection-level failure talking to the store API.
    #[error("Store API transport error: {0}")]
    Transport(String),

    /// Store API answered with a non-success status.
    #[error("Store API returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code of the response.
        status: u16,
    },

    /// Failed to encode a request or decode a response.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// No command with this name is registered.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl TeamGamesError {
    /// Whether this error came from the HTTP exchange itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TeamGamesError::Transport(_) | TeamGamesError::HttpStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let err = TeamGamesError::HttpStatus { status: 503 };
        assert_eq!(err.to_string(), "Store API returned HTTP 503");
    }

    #[test]
    fn test_is_transport() {
        assert!(TeamGamesError::Transport("refused".into()).is_transport());
        assert!(TeamGamesError::HttpStatus { status: 401 }.is_transport());
        assert!(!TeamGamesError::ProtocolError("bad".into()).is_transport());
        assert!(!TeamGamesError::ConfigIO("disk".into()).is_transport());
    }
}
