//! Scripted transport shared by the unit tests of this crate.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use adex_domain::{ApiResponse, OutboundRequest};
use serde_json::Value;

use crate::client::SessionHttpClient;
use crate::config::ClientConfig;
use crate::ports::{HttpTransport, TransportError};
use crate::session::SessionStore;

pub const BASE_URL: &str = "http://backend.test/api";

type Handler = dyn Fn(&OutboundRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// Answers every request with a closure and records what was sent.
pub struct RecordingTransport {
    handler: Box<Handler>,
    sent: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&OutboundRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same JSON body.
    pub fn always(status: u16, body: Value) -> Self {
        Self::new(move |_| Ok(ApiResponse::json_body(status, &body)))
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, path: &str) -> Vec<OutboundRequest> {
        self.sent()
            .into_iter()
            .filter(|request| route(request) == path)
            .collect()
    }
}

impl HttpTransport for RecordingTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ApiResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

/// Path of the request relative to [`BASE_URL`].
pub fn route(request: &OutboundRequest) -> &str {
    request
        .url
        .path()
        .strip_prefix("/api")
        .unwrap_or_else(|| request.url.path())
}

/// Decoded JSON body of a request.
pub fn body(request: &OutboundRequest) -> Value {
    request
        .body
        .as_deref()
        .map_or(Value::Null, |bytes| serde_json::from_slice(bytes).unwrap())
}

pub fn config() -> ClientConfig {
    ClientConfig::new(BASE_URL).unwrap()
}

/// Client over `transport` with an empty in-memory session.
pub fn client(transport: RecordingTransport) -> Arc<SessionHttpClient<RecordingTransport>> {
    Arc::new(SessionHttpClient::new(
        transport,
        SessionStore::in_memory(),
        config(),
    ))
}
