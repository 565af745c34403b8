//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tavola                                 │
//! │                                                                         │
//! │  tavola cart add r1 m9                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  CliResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │  StoreError?  ──── StoreError::QueryFailed("...") ──┐            │  │
//! │  │  ClientError? ──── ClientError::Api{404, "..."} ────┤            │  │
//! │  │  CoreError?   ──── CoreError::QuantityTooLarge ─────┴─► CliError │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                           │             │
//! │  main ◄── anyhow ◄────────────────────────────────────────┘             │
//! │  stderr: "error[NOT_FOUND]: Restaurant not found"                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tavola_client::ClientError;
use tavola_core::CoreError;
use tavola_store::StoreError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

/// Error returned from commands.
///
/// ## Serialization
/// With `--json` this is what a script receives on stderr:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Restaurant not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Backend answered 404 or an id was not found locally
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart rule violated (size caps, empty cart)
    CartError,

    /// Not logged in, or the session expired
    AuthRequired,

    /// Backend unreachable or too slow
    NetworkError,

    /// Backend rejected the request
    BackendError,

    /// Local database failure
    StorageError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::AuthRequired => "AUTH_REQUIRED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::BackendError => "BACKEND_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::ValidationError | ErrorCode::CartError => 2,
            ErrorCode::AuthRequired => 3,
            ErrorCode::NotFound => 4,
            ErrorCode::NetworkError | ErrorCode::BackendError => 5,
            ErrorCode::StorageError | ErrorCode::ConfigError | ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::Validation(_)
            | CoreError::UnsupportedPageSize { .. }
            | CoreError::QuantityTooLarge { .. } => ErrorCode::ValidationError,
            CoreError::ItemNotInCart(_) => ErrorCode::NotFound,
            CoreError::MissingRestaurant { .. }
            | CoreError::CartTooLarge { .. }
            | CoreError::EmptyCart => ErrorCode::CartError,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let err = match err {
            ClientError::Core(core) => return CliError::from(core),
            other => other,
        };
        let code = match &err {
            ClientError::Core(_) => ErrorCode::Internal,
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_) => ErrorCode::ConfigError,
            ClientError::Transport(_) | ClientError::Timeout => ErrorCode::NetworkError,
            ClientError::Api { status: 404, .. } => ErrorCode::NotFound,
            ClientError::Api { status: 400 | 422, .. } => ErrorCode::ValidationError,
            ClientError::Api { status: 401 | 403, .. }
            | ClientError::Unauthenticated
            | ClientError::SessionExpired
            | ClientError::InvalidToken(_) => ErrorCode::AuthRequired,
            ClientError::Api { .. } | ClientError::Decode(_) => ErrorCode::BackendError,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Local store failure");
        CliError::new(
            ErrorCode::StorageError,
            format!("Local storage failed: {}", err),
        )
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(ErrorCode::Internal, err.to_string())
    }
}
