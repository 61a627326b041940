//! The backend's standard response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// `{ success, message?, data }` wrapper returned by every backend endpoint.
///
/// `data` is kept as raw JSON until the caller picks a type, so endpoints
/// that return no payload can still be decoded into `()` or `Value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the backend accepted the operation
    #[serde(default = "default_success")]
    pub success: bool,
    /// Human-readable outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload; a missing field decodes as `None`
    pub data: Option<T>,
}

const fn default_success() -> bool {
    true
}

impl Envelope<Value> {
    /// Decodes `data` into `T`.
    ///
    /// A missing or null `data` is decoded from JSON `null`, which succeeds
    /// for `()`, `Option<_>` and `Value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not match `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> DomainResult<T> {
        let data = self.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| DomainError::MalformedEnvelope(e.to_string()))
    }
}
