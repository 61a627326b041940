//! Sign-in, registration and profile endpoints.

use std::sync::Arc;
use std::time::Duration;

use adex_domain::{ApiRequest, LoginCredentials, LoginPayload, ProfileUpdate, Registration, UserProfile};
use serde_json::{Value, json};

use crate::client::SessionHttpClient;
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpTransport;

/// Timeout for email verification, which may hit a cold backend.
pub const VERIFY_EMAIL_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Tokens were issued and the session is stored.
    Authenticated {
        /// Signed-in user
        user: Option<UserProfile>,
    },
    /// The account has 2FA enabled; repeat the login with a code.
    TwoFactorRequired,
}

/// Authentication endpoints.
pub struct AuthService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> AuthService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Signs in and stores the issued session.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, or [`ApiError::Rejected`] when the
    /// response carries no token pair.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<LoginOutcome> {
        let payload: Option<LoginPayload> = self.client.post("/auth/login", credentials).await?;
        let payload = payload.ok_or_else(|| ApiError::Rejected {
            message: "Invalid login response".to_string(),
        })?;

        if payload.two_factor_required {
            tracing::info!(email = %credentials.email, "two-factor code required");
            return Ok(LoginOutcome::TwoFactorRequired);
        }

        let (Some(access_token), Some(refresh_token)) =
            (payload.access_token, payload.refresh_token)
        else {
            return Err(ApiError::Rejected {
                message: "Invalid login response".to_string(),
            });
        };

        self.client
            .session()
            .login(payload.user.clone(), access_token, refresh_token)
            .await?;
        Ok(LoginOutcome::Authenticated { user: payload.user })
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, e.g. an email already in use.
    pub async fn register(&self, registration: &Registration) -> ApiResult<Value> {
        self.client.post("/auth/register", registration).await
    }

    /// Confirms an email address with the token from the verification mail.
    ///
    /// # Errors
    ///
    /// Returns the backend's error for an invalid or expired token.
    pub async fn verify_email(&self, token: &str) -> ApiResult<Value> {
        self.client
            .fetch(
                ApiRequest::get("/auth/verify-email")
                    .with_query("token", token)
                    .with_timeout(VERIFY_EMAIL_TIMEOUT),
            )
            .await
    }

    /// Sends the verification mail again.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn resend_verification(&self, email: &str) -> ApiResult<Value> {
        self.client
            .post("/auth/resend-verification", &json!({ "email": email }))
            .await
    }

    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn profile(&self) -> ApiResult<Value> {
        self.client.get("/auth/profile").await
    }

    /// Updates the profile and merges the result into the stored user.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, or a storage error if the merged user
    /// cannot be persisted.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Value> {
        let updated: Value = self.client.patch("/auth/profile", update).await?;

        let patch = if updated.is_object() {
            updated.clone()
        } else {
            serde_json::to_value(update)?
        };
        self.client.session().update_user(&patch).await?;
        Ok(updated)
    }

    /// Ends the session locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleared session cannot be persisted.
    pub async fn logout(&self) -> ApiResult<()> {
        self.client.session().logout().await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingTransport, body, client, route};
    use adex_domain::ApiResponse;
    use pretty_assertions::assert_eq;

    fn login_backend(data: Value) -> RecordingTransport {
        RecordingTransport::new(move |_| {
            Ok(ApiResponse::json_body(200, &json!({"success": true, "data": data})))
        })
    }

    #[tokio::test]
    async fn login_stores_session() {
        let client = client(login_backend(json!({
            "user": {"email": "ada@example.com", "role": "user"},
            "accessToken": "A1",
            "refreshToken": "R1"
        })));
        let auth = AuthService::new(Arc::clone(&client));

        let outcome = auth
            .login(&LoginCredentials::new("ada@example.com", "secret"))
            .await
            .unwrap();

        let LoginOutcome::Authenticated { user } = outcome else {
            panic!("expected authenticated outcome");
        };
        assert_eq!(user.and_then(|u| u.email).as_deref(), Some("ada@example.com"));
        assert!(client.session().is_authenticated().await);
        assert_eq!(
            client.session().credentials().await,
            (Some("A1".to_string()), Some("R1".to_string()))
        );
        let sent = client.transport().sent();
        assert_eq!(
            body(&sent[0]),
            json!({"email": "ada@example.com", "password": "secret"})
        );
    }

    #[tokio::test]
    async fn login_waits_for_second_factor() {
        let client = client(login_backend(json!({"twoFactorRequired": true})));
        let auth = AuthService::new(Arc::clone(&client));

        let outcome = auth
            .login(&LoginCredentials::new("ada@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(outcome, LoginOutcome::TwoFactorRequired);
        assert!(!client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn login_without_tokens_is_rejected() {
        let client = client(login_backend(json!({"accessToken": "A1"})));
        let auth = AuthService::new(Arc::clone(&client));

        let error = auth
            .login(&LoginCredentials::new("ada@example.com", "secret"))
            .await
            .unwrap_err();

        assert_eq!(error.user_message(), "Invalid login response");
        assert!(client.session().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn verify_email_sends_token_with_long_timeout() {
        let client = client(RecordingTransport::always(
            200,
            json!({"success": true, "message": "Email verified"}),
        ));
        AuthService::new(Arc::clone(&client))
            .verify_email("tok-123")
            .await
            .unwrap();

        let sent = client.transport().sent();
        assert_eq!(route(&sent[0]), "/auth/verify-email");
        assert_eq!(sent[0].url.query(), Some("token=tok-123"));
        assert_eq!(sent[0].timeout, Some(VERIFY_EMAIL_TIMEOUT));
    }

    #[tokio::test]
    async fn update_profile_merges_into_stored_user() {
        let client = client(RecordingTransport::always(
            200,
            json!({"success": true, "data": {"full_name": "Ada L.", "language": "fr"}}),
        ));
        client
            .session()
            .login(
                Some(UserProfile {
                    email: Some("ada@example.com".to_string()),
                    ..UserProfile::default()
                }),
                "A1".to_string(),
                "R1".to_string(),
            )
            .await
            .unwrap();

        AuthService::new(Arc::clone(&client))
            .update_profile(&ProfileUpdate {
                full_name: Some("Ada L.".to_string()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();

        let user = client.session().user().await.unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Ada L."));
        assert_eq!(user.language.as_deref(), Some("fr"));
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let client = client(RecordingTransport::always(200, json!({})));
        client
            .session()
            .login(None, "A1".to_string(), "R1".to_string())
            .await
            .unwrap();

        AuthService::new(Arc::clone(&client)).logout().await.unwrap();

        assert!(client.session().snapshot().await.is_empty());
        assert!(client.transport().sent().is_empty());
    }
}
