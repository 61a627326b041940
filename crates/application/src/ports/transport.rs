//! HTTP transport port

use std::future::Future;

use adex_domain::{ApiResponse, OutboundRequest};
use thiserror::Error;

/// Failures where no HTTP response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed
        timeout_ms: u64,
    },

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that could not be resolved
        host: String,
        /// Error message
        message: String,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for sending a resolved request over the wire.
///
/// Implementations do not interpret status codes: any response that arrives,
/// including 4xx and 5xx, is returned as `Ok`.
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    fn send(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}
