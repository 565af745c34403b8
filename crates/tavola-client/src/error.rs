//! # Client Error Types
//!
//! Error types for everything that talks to the backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Api { status, message }│ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Decode                 │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Session      │  │     Core        │                              │
//! │  │                 │  │                 │                              │
//! │  │  Unauthenticated│  │  Cart / listing │                              │
//! │  │  SessionExpired │  │  Validation     │                              │
//! │  │  InvalidToken   │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tavola_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response (DNS, refused, reset).
    #[error("Cannot reach the server: {0}")]
    Transport(String),

    #[error("The server did not answer in time")]
    Timeout,

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Non-2xx response. `message` is the backend's own `message` field when
    /// it sent one, otherwise a default for the operation.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("You need to log in first")]
    Unauthenticated,

    #[error("Your session has expired, please log in again")]
    SessionExpired,

    /// Token could not be decoded or lacks required claims.
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    // =========================================================================
    // Core Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Transport failures, timeouts and 5xx responses are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True for 401 responses and local session failures.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status: 401, .. }
                | ClientError::Unauthenticated
                | ClientError::SessionExpired
                | ClientError::InvalidToken(_)
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::InvalidToken(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Transport("refused".into()).is_retryable());
        assert!(ClientError::Api {
            status: 503,
            message: "down".into()
        }
        .is_retryable());
        assert!(!ClientError::Api {
            status: 404,
            message: "missing".into()
        }
        .is_retryable());
        assert!(!ClientError::Unauthenticated.is_retryable());
    }

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Email already registered".into(),
        };
        assert_eq!(err.to_string(), "Email already registered");
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_validation_converts_through_core() {
        let err: ClientError = ValidationError::Required {
            field: "email".into(),
        }
        .into();
        assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));
    }
}
