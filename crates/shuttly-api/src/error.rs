// API error types
//
// Every failure path in this crate normalizes to one of these variants,
// each carrying a human-readable message. Callers surface the message
// and decide whether to retry; nothing here retries on its own.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure: DNS, connect, TLS, timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the request or reported `success: false`.
    /// The message is the backend's own `{"message": ...}` when the
    /// body was parseable JSON, otherwise the HTTP status text.
    #[error("{message}")]
    Api { message: String },

    /// Missing, expired, or invalid bearer token (HTTP 401).
    /// Callers treat this as a session error: forced logout, no retry.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The response body did not match the expected shape.
    #[error("failed to deserialize response: {message}")]
    Deserialization { message: String, body: String },

    /// A request URL could not be constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Whether this error should end the current session.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
