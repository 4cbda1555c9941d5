//! Shared error type across actionsock crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// No handler is registered for the derived action key.
    UnknownAction,
    /// A gated action arrived without a bearer token.
    NotAuthenticated,
    /// Bearer token malformed, expired, or signature mismatch.
    InvalidToken,
    /// Server-side misconfiguration (e.g. missing token secret).
    Config,
    /// Invalid input / malformed message.
    BadRequest,
    /// Frame exceeds the configured size limit.
    PayloadTooLarge,
    /// Session closed after no inbound traffic for the idle window.
    Timeout,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::UnknownAction => "UNKNOWN_ACTION",
            ClientCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientCode::InvalidToken => "INVALID_TOKEN",
            ClientCode::Config => "CONFIG",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ActionSockError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ActionSockError {
    /// Carries the computed registry key, e.g. `handleZoneJoin`.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("idle timeout")]
    IdleTimeout,
    #[error("internal: {0}")]
    Internal(String),
}

impl ActionSockError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ActionSockError::UnknownAction(_) => ClientCode::UnknownAction,
            ActionSockError::NotAuthenticated => ClientCode::NotAuthenticated,
            ActionSockError::InvalidToken(_) => ClientCode::InvalidToken,
            ActionSockError::Config(_) => ClientCode::Config,
            ActionSockError::BadRequest(_) => ClientCode::BadRequest,
            ActionSockError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            ActionSockError::IdleTimeout => ClientCode::Timeout,
            ActionSockError::Internal(_) => ClientCode::Internal,
        }
    }
}
