//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The base URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request path is not relative to the API base URL.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A locale tag is empty or malformed.
    #[error("invalid locale: {0}")]
    InvalidLocale(String),

    /// A transaction filter name is not recognised.
    #[error("unknown transaction filter: {0}")]
    UnknownFilter(String),

    /// A response body does not follow the `{ success, message, data }` envelope.
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
