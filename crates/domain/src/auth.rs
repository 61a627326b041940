//! Authentication payloads exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::UserProfile;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// One-time code, required when the account has 2FA enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_factor_token: Option<String>,
}

impl LoginCredentials {
    /// Creates credentials without a 2FA code.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            two_factor_token: None,
        }
    }

    /// Adds a 2FA code.
    #[must_use]
    pub fn with_two_factor(mut self, token: impl Into<String>) -> Self {
        self.two_factor_token = Some(token.into());
        self
    }
}

/// `data` of a login response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Signed-in user
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Access token, absent while 2FA is pending
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token, absent while 2FA is pending
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Set when the backend wants a 2FA code before issuing tokens
    #[serde(default)]
    pub two_factor_required: bool,
}

/// Body of `POST /auth/refresh-token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest<'a> {
    /// The stored refresh token
    pub refresh_token: &'a str,
}

/// Tokens issued by the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    /// New access token
    pub access_token: String,
    /// Rotated refresh token, when the backend issues one
    pub refresh_token: Option<String>,
}

impl RefreshedTokens {
    /// Extracts tokens from a refresh response body.
    ///
    /// The backend has answered both with a bare `{ accessToken }` and with
    /// the standard envelope `{ success, data: { accessToken } }`, so both
    /// layouts are accepted. Returns `None` when no non-empty access token
    /// is present.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let source = if body.get("accessToken").is_some() {
            body
        } else {
            body.get("data")?
        };

        let access_token = source
            .get("accessToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())?
            .to_string();
        let refresh_token = source
            .get("refreshToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Some(Self {
            access_token,
            refresh_token,
        })
    }
}

/// Shortens a token for log output: first 8 chars followed by `...`.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let cut = token
            .char_indices()
            .nth(8)
            .map_or(token.len(), |(index, _)| index);
        format!("{}...", &token[..cut])
    } else {
        "***".to_string()
    }
}
