//! Application error types

use adex_domain::{ApiResponse, DomainError, UNAUTHORIZED};
use thiserror::Error;

use crate::ports::{StorageError, TransportError};

/// Errors returned by the session client and the services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed
        timeout_ms: u64,
    },

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Status code
        status: u16,
        /// The backend's `message`, or a generic description
        message: String,
        /// Decoded error body, when it was JSON
        body: Option<serde_json::Value>,
    },

    /// The backend answered 2xx but flagged `success: false`.
    #[error("request rejected: {message}")]
    Rejected {
        /// The backend's `message`
        message: String,
    },

    /// The session could not be recovered and has been cleared.
    #[error("session expired: {cause}")]
    SessionExpired {
        /// The error that triggered termination
        cause: Box<ApiError>,
    },

    /// A response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The session could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// Builds a status error from a non-2xx response.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        let message = response
            .error_message()
            .unwrap_or_else(|| default_message(response.status).to_string());
        Self::Status {
            status: response.status,
            message,
            body: response.json_value(),
        }
    }

    /// Returns true when no response was received.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }

    /// Returns true for a final `401` or a terminated session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status {
                status: UNAUTHORIZED,
                ..
            } | Self::SessionExpired { .. }
        )
    }

    /// Returns true when the session was torn down.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Returns the HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the text a caller would show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.clone(),
            Self::SessionExpired { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
            TransportError::InvalidRequest(message) => Self::InvalidRequest(message),
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidRequest(error.to_string())
    }
}

/// Text shown when the session is torn down.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

const fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        422 => "Unprocessable entity",
        429 => "Too many requests",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_carries_backend_message() {
        let response = ApiResponse::json_body(
            400,
            &json!({"success": false, "message": "Minimum withdrawal is 10"}),
        );
        let error = ApiError::from_response(&response);
        assert_eq!(error.status(), Some(400));
        assert_eq!(error.user_message(), "Minimum withdrawal is 10");
        assert!(!error.is_network());
    }

    #[test]
    fn status_error_without_body_uses_default_text() {
        let error = ApiError::from_response(&ApiResponse::new(503, ""));
        assert_eq!(error.to_string(), "HTTP 503: Server error");
    }

    #[test]
    fn transport_errors_are_network_errors() {
        let error = ApiError::from(TransportError::Connection("refused".to_string()));
        assert!(error.is_network());
        assert_eq!(error.status(), None);

        let error = ApiError::from(TransportError::Timeout { timeout_ms: 30_000 });
        assert!(matches!(error, ApiError::Timeout { timeout_ms: 30_000 }));
        assert!(error.is_network());
    }

    #[test]
    fn session_expiry_is_unauthorized() {
        let cause = ApiError::from_response(&ApiResponse::new(401, ""));
        assert!(cause.is_unauthorized());
        let error = ApiError::SessionExpired {
            cause: Box::new(cause),
        };
        assert!(error.is_unauthorized());
        assert!(error.is_session_expired());
        assert_eq!(error.user_message(), SESSION_EXPIRED_MESSAGE);
    }
}
