//! Response specification type

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::Envelope;
use crate::error::{DomainError, DomainResult};

/// Status code the backend uses for an expired or missing access token.
pub const UNAUTHORIZED: u16 = 401;

/// A response received from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, lowercase names
    pub headers: HashMap<String, String>,
    /// Raw response body
    pub body: Vec<u8>,
    /// Time from send to last body byte
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
            duration: Duration::ZERO,
        }
    }

    /// Creates a response carrying a JSON body.
    #[must_use]
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true for `401 Unauthorized`.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHORIZED
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| DomainError::MalformedEnvelope(e.to_string()))
    }

    /// Decodes the body as a standard `{ success, message, data }` envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not an envelope.
    pub fn envelope<T: DeserializeOwned>(&self) -> DomainResult<Envelope<T>> {
        self.json()
    }

    /// Returns the body as JSON, or `None` if it is empty or not JSON.
    #[must_use]
    pub fn json_value(&self) -> Option<serde_json::Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// Extracts the backend's `message` field from an error body, falling
    /// back to the raw text when the body is not JSON.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if let Some(value) = self.json_value() {
            return value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
        }
        let text = String::from_utf8_lossy(&self.body).trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}
