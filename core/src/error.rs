//! Error types for the PSN client.
//!
//! # Design
//! The PSN API reports failures in-band: a response body carrying an
//! `error` object is a failure whatever the HTTP status says. Those land in
//! `Domain` with the remote message verbatim. Network failures are kept
//! apart in `Transport` so callers can tell "the server said no" from "we
//! never reached the server."

/// Errors returned by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, TLS, timeout, body read).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The request could not be mapped onto the HTTP client.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors returned by `PsnClient`, `Session` and `User` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with an `error` object.
    #[error("{message}")]
    Domain { message: String, code: Option<i64> },

    /// The caller asked for a code path that has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A non-2xx response whose body was not JSON.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The operation's inputs cannot form a request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// The remote message for `Domain` failures.
    pub fn domain_message(&self) -> Option<&str> {
        match self {
            ApiError::Domain { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}
