//! Session-aware HTTP client.
//!
//! Every call goes through [`SessionHttpClient::request`], which attaches the
//! bearer token and `Accept-Language`, and recovers from one expired access
//! token per request by calling the refresh endpoint and reissuing. When the
//! session cannot be recovered it is cleared, subscribers are notified and
//! the call fails with [`ApiError::SessionExpired`].

use std::fmt;
use std::sync::Arc;

use adex_domain::{
    ApiRequest, ApiResponse, Envelope, OutboundRequest, RefreshTokenRequest, RefreshedTokens,
    RequestPhase,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpTransport;
use crate::session::{RefreshOutcome, SessionExpiredHandler, SessionStore};

const JSON: &str = "application/json";

/// Why a refresh could not produce a usable access token.
enum RefreshFailure {
    /// The session holds no refresh token.
    MissingRefreshToken,
    /// The refresh call failed or returned no access token.
    Refresh(ApiError),
    /// The session was logged out or replaced while the refresh was in flight.
    Superseded,
}

/// HTTP client bound to a [`SessionStore`].
pub struct SessionHttpClient<T> {
    transport: T,
    session: SessionStore,
    config: ClientConfig,
    /// Held while a refresh is in flight so concurrent 401s share one refresh.
    refresh_gate: Mutex<()>,
    on_expired: Option<Arc<dyn SessionExpiredHandler>>,
}

impl<T: HttpTransport> SessionHttpClient<T> {
    /// Creates a client sending through `transport` with credentials from `session`.
    #[must_use]
    pub fn new(transport: T, session: SessionStore, config: ClientConfig) -> Self {
        Self {
            transport,
            session,
            config,
            refresh_gate: Mutex::new(()),
            on_expired: None,
        }
    }

    /// Registers the handler invoked after a session is terminated,
    /// typically to navigate to sign-in.
    #[must_use]
    pub fn with_expired_handler(mut self, handler: impl SessionExpiredHandler + 'static) -> Self {
        self.on_expired = Some(Arc::new(handler));
        self
    }

    /// Returns the session store.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` and returns the 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] / [`ApiError::Timeout`] when no response arrived
    /// - [`ApiError::Status`] for any non-2xx answer, including a second 401
    /// - [`ApiError::SessionExpired`] when a 401 could not be recovered
    pub async fn request(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let span = tracing::debug_span!(
            "api_request",
            request_id = %Uuid::now_v7(),
            method = %request.method,
            path = %request.path,
        );
        self.run(request).instrument(span).await
    }

    /// Sends `request` and decodes the `data` of the response envelope.
    ///
    /// # Errors
    ///
    /// Everything [`Self::request`] returns, plus [`ApiError::Rejected`] when
    /// the envelope says `success: false` and [`ApiError::Decode`] when the
    /// payload does not match `R`.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let response = self.request(request).await?;
        decode_envelope(&response)
    }

    /// `GET path`, decoding the envelope payload.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.fetch(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body, decoding the envelope payload.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn post<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.fetch(ApiRequest::post(path).with_json(body)?).await
    }

    /// `POST path` without a body, decoding the envelope payload.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.fetch(ApiRequest::post(path)).await
    }

    /// `PATCH path` with a JSON body, decoding the envelope payload.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch`].
    pub async fn patch<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.fetch(ApiRequest::patch(path).with_json(body)?).await
    }

    async fn run(&self, mut request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut phase = RequestPhase::Issued;

        loop {
            let access_token = self.session.access_token().await;
            let outbound = self.outbound(&request, access_token.as_deref()).await?;

            let response = match self.transport.send(&outbound).await {
                Ok(response) => response,
                Err(error) => {
                    phase = phase.on_transport_error();
                    tracing::debug!(%phase, %error, "no response received");
                    return Err(error.into());
                }
            };

            phase = phase.on_response(response.status, request.is_retried());
            tracing::debug!(status = response.status, %phase, "response received");

            match phase {
                RequestPhase::Done => return Ok(response),
                RequestPhase::Refreshing => {
                    request.mark_retried();
                    match self.refresh_access_token(access_token.as_deref()).await {
                        Ok(()) => phase = phase.on_refresh(true),
                        Err(RefreshFailure::Superseded) => {
                            phase = phase.on_session_replaced();
                            tracing::debug!(%phase, "session changed during refresh");
                            return Err(ApiError::from_response(&response));
                        }
                        Err(failure) => {
                            phase = phase.on_refresh(false);
                            let cause = match failure {
                                RefreshFailure::Refresh(error) => error,
                                RefreshFailure::MissingRefreshToken
                                | RefreshFailure::Superseded => ApiError::from_response(&response),
                            };
                            let error = self.terminate(cause).await;
                            phase = phase.on_session_cleared();
                            tracing::debug!(%phase, "request abandoned");
                            return Err(error);
                        }
                    }
                }
                _ => return Err(ApiError::from_response(&response)),
            }
        }
    }

    /// Obtains a new access token, or confirms a concurrent request already did.
    ///
    /// `stale` is the access token the failed attempt was sent with.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<(), RefreshFailure> {
        let _gate = self.refresh_gate.lock().await;

        let (access_token, refresh_token) = self.session.credentials().await;
        let Some(refresh_token) = refresh_token else {
            tracing::debug!("no refresh token stored");
            return Err(RefreshFailure::MissingRefreshToken);
        };

        if access_token.is_some() && access_token.as_deref() != stale {
            tracing::debug!("access token was already refreshed by a concurrent request");
            return Ok(());
        }

        let tokens = self
            .call_refresh_endpoint(&refresh_token)
            .await
            .map_err(RefreshFailure::Refresh)?;

        match self.session.apply_refresh(&refresh_token, tokens).await {
            RefreshOutcome::Applied => Ok(()),
            RefreshOutcome::Superseded => Err(RefreshFailure::Superseded),
        }
    }

    async fn call_refresh_endpoint(&self, refresh_token: &str) -> ApiResult<RefreshedTokens> {
        let request = ApiRequest::post(self.config.refresh_path.as_str())
            .with_json(&RefreshTokenRequest { refresh_token })?;
        let outbound = self.outbound(&request, None).await?;

        let response = self.transport.send(&outbound).await?;
        if !response.is_success() {
            tracing::debug!(status = response.status, "refresh endpoint refused");
            return Err(ApiError::from_response(&response));
        }

        let body = response.json_value().unwrap_or(Value::Null);
        RefreshedTokens::from_body(&body)
            .ok_or_else(|| ApiError::Decode("refresh response carried no access token".to_string()))
    }

    async fn terminate(&self, cause: ApiError) -> ApiError {
        tracing::warn!(error = %cause, "session could not be recovered");
        let event = self.session.expire().await;
        if let Some(handler) = &self.on_expired {
            handler.on_session_expired(&event);
        }
        ApiError::SessionExpired {
            cause: Box::new(cause),
        }
    }

    async fn outbound(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> ApiResult<OutboundRequest> {
        let url = request.resolve_url(&self.config.base_url)?;
        let locale = self.session.locale().await;

        let mut headers = vec![
            ("Accept".to_string(), JSON.to_string()),
            ("Accept-Language".to_string(), locale.to_string()),
        ];
        if let Some(token) = access_token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let body = match &request.body {
            Some(body) => {
                headers.push(("Content-Type".to_string(), JSON.to_string()));
                Some(serde_json::to_vec(body)?)
            }
            None => None,
        };

        Ok(OutboundRequest {
            method: request.method,
            url,
            headers,
            body,
            timeout: Some(request.timeout.unwrap_or(self.config.timeout)),
        })
    }
}

impl<T> fmt::Debug for SessionHttpClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHttpClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Decodes a 2xx response carrying the standard envelope.
///
/// An empty body is treated as an envelope without payload.
fn decode_envelope<R: DeserializeOwned>(response: &ApiResponse) -> ApiResult<R> {
    let envelope: Envelope = if response.body.is_empty() {
        Envelope {
            success: true,
            message: None,
            data: None,
        }
    } else {
        response
            .envelope()
            .map_err(|e| ApiError::Decode(e.to_string()))?
    };

    if !envelope.success {
        return Err(ApiError::Rejected {
            message: envelope
                .message
                .unwrap_or_else(|| "Request failed".to_string()),
        });
    }
    envelope
        .into_data()
        .map_err(|e| ApiError::Decode(e.to_string()))
}
