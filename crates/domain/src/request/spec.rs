//! Request specification types

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// A logical call against the backend API.
///
/// The path is relative to the configured base URL. The request keeps its
/// retry marker across the refresh-and-reissue cycle so a reissued request
/// is never refreshed a second time.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// Query parameters, in insertion order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Per-request timeout overriding the transport default
    pub timeout: Option<Duration>,
    retried: bool,
}

impl ApiRequest {
    /// Creates a request with no body or query.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
            retried: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` and attaches it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn with_json<B: Serialize>(self, body: &B) -> Result<Self, serde_json::Error> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Overrides the transport timeout for this request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns true once the request has been reissued after a 401.
    #[must_use]
    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    /// Sets the retry marker.
    pub const fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Resolves the absolute URL of this request against `base`.
    ///
    /// The path is appended to the base path rather than replacing it, so a
    /// base of `https://host/api` and a path of `/wallet` yield
    /// `https://host/api/wallet`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a relative `/`-prefixed path.
    pub fn resolve_url(&self, base: &Url) -> DomainResult<Url> {
        if !self.path.starts_with('/') || self.path.contains("://") {
            return Err(DomainError::InvalidPath(self.path.clone()));
        }

        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), self.path);
        let mut url = Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// A fully resolved request, ready for the transport.
///
/// Built per attempt from an [`ApiRequest`] plus the current session
/// credentials and locale. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: Url,
    /// Headers in send order
    pub headers: Vec<(String, String)>,
    /// Encoded body
    pub body: Option<Vec<u8>>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl OutboundRequest {
    /// Returns the first header value with the given name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the bearer token carried by the `Authorization` header.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}
