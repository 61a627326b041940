//! Password and two-factor management.

use std::sync::Arc;

use adex_domain::{ApiRequest, PasswordChange, PasswordReset, TwoFactorSetup};
use serde_json::{Value, json};

use super::take_list;
use crate::client::SessionHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Password reset and change endpoints.
pub struct PasswordService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> PasswordService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Mails a reset link to `email`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn request_reset(&self, email: &str) -> ApiResult<Value> {
        self.client
            .post("/password/request-reset", &json!({ "email": email.trim() }))
            .await
    }

    /// Checks that a reset token is still valid.
    ///
    /// # Errors
    ///
    /// Returns the backend's error for an unknown or expired token.
    pub async fn verify_reset_token(&self, token: &str) -> ApiResult<Value> {
        self.client
            .fetch(ApiRequest::get("/password/verify-token").with_query("token", token))
            .await
    }

    /// Sets a new password with a reset token.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn reset(&self, reset: &PasswordReset) -> ApiResult<Value> {
        self.client.post("/password/reset", reset).await
    }

    /// Changes the password of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, e.g. a wrong current password.
    pub async fn change(&self, change: &PasswordChange) -> ApiResult<Value> {
        self.client.post("/password/change", change).await
    }
}

/// Two-factor authentication endpoints.
pub struct TwoFactorService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> TwoFactorService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Starts enrolment and returns the TOTP secret.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn generate(&self) -> ApiResult<TwoFactorSetup> {
        self.client.post_empty("/2fa/generate").await
    }

    /// Confirms enrolment with a code and returns the backup codes.
    ///
    /// # Errors
    ///
    /// Returns the backend's error for a wrong code.
    pub async fn enable(&self, code: &str) -> ApiResult<Vec<String>> {
        let data: Value = self.client.post("/2fa/enable", &json!({ "token": code })).await?;
        Ok(take_list(data, "backupCodes")
            .into_iter()
            .filter_map(|code| code.as_str().map(str::to_string))
            .collect())
    }

    /// Turns 2FA off after checking a current code.
    ///
    /// # Errors
    ///
    /// Returns the backend's error for a wrong code.
    pub async fn disable(&self, code: &str) -> ApiResult<Value> {
        self.client.post("/2fa/disable", &json!({ "token": code })).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingTransport, body, client, route};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn reset_flow_hits_password_endpoints() {
        let client = client(RecordingTransport::always(200, json!({"success": true})));
        let passwords = PasswordService::new(Arc::clone(&client));

        passwords.request_reset("  ada@example.com ").await.unwrap();
        passwords.verify_reset_token("t1").await.unwrap();
        passwords
            .reset(&PasswordReset {
                token: "t1".to_string(),
                new_password: "n3w".to_string(),
            })
            .await
            .unwrap();

        let sent = client.transport().sent();
        let routes: Vec<&str> = sent.iter().map(route).collect();
        assert_eq!(
            routes,
            vec!["/password/request-reset", "/password/verify-token", "/password/reset"]
        );
        assert_eq!(body(&sent[0]), json!({"email": "ada@example.com"}));
        assert_eq!(sent[1].url.query(), Some("token=t1"));
        assert_eq!(body(&sent[2]), json!({"token": "t1", "newPassword": "n3w"}));
    }

    #[tokio::test]
    async fn enable_returns_backup_codes() {
        let client = client(RecordingTransport::always(
            200,
            json!({"success": true, "data": {"backupCodes": ["a1", "b2"]}}),
        ));

        let codes = TwoFactorService::new(Arc::clone(&client))
            .enable("123456")
            .await
            .unwrap();

        assert_eq!(codes, vec!["a1".to_string(), "b2".to_string()]);
        assert_eq!(body(&client.transport().sent()[0]), json!({"token": "123456"}));
    }

    #[tokio::test]
    async fn generate_decodes_setup() {
        let client = client(RecordingTransport::always(
            200,
            json!({"success": true, "data": {"secret": "JBSWY3DP", "qrCode": "otpauth://totp/adex"}}),
        ));

        let setup = TwoFactorService::new(client).generate().await.unwrap();

        assert_eq!(setup.secret, "JBSWY3DP");
        assert_eq!(setup.qr_code, "otpauth://totp/adex");
    }
}
