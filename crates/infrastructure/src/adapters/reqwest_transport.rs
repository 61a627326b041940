//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. It sends exactly what
//! the session client resolved and never interprets status codes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use adex_application::ClientConfig;
use adex_application::ports::{HttpTransport, TransportError};
use adex_domain::{ApiResponse, HttpMethod, OutboundRequest};
use reqwest::{Client, Method};

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    default_timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            default_timeout: config.timeout,
        })
    }

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
        }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
        }
    }

    fn map_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        if error.is_builder() {
            return TransportError::InvalidRequest(error.to_string());
        }

        if error.is_connect() {
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return TransportError::Dns {
                    host: error
                        .url()
                        .and_then(|u| u.host_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message,
                };
            }
            return TransportError::Connection(message);
        }

        if error.is_body() || error.is_decode() {
            return TransportError::Body(error.to_string());
        }

        TransportError::Other(error.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ApiResponse, TransportError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone())
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?
            .to_vec();
        let duration = start.elapsed();

        tracing::trace!(
            method = %request.method,
            url = %request.url,
            status,
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "transport round trip"
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
    }

    #[test]
    fn builds_from_config() {
        let transport = ReqwestTransport::new(&ClientConfig::default());
        assert!(transport.is_ok());
    }
}
