//! Admin console endpoints.

use std::sync::Arc;

use adex_domain::{UserStatusUpdate, WithdrawalRejection};
use serde_json::Value;

use super::take_list;
use crate::client::SessionHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Admin endpoints. The backend rejects callers without the admin role.
pub struct AdminService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> AdminService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Fetches platform totals.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn dashboard(&self) -> ApiResult<Value> {
        self.client.get("/admin/dashboard").await
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn users(&self) -> ApiResult<Value> {
        self.client.get("/admin/users").await
    }

    /// Activates or suspends a user.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn set_user_active(&self, id: &str, is_active: bool) -> ApiResult<Value> {
        self.client
            .patch(
                &format!("/admin/users/{id}/status"),
                &UserStatusUpdate { is_active },
            )
            .await
    }

    /// Lists withdrawals awaiting review.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn pending_withdrawals(&self) -> ApiResult<Value> {
        self.client.get("/admin/withdrawals/pending").await
    }

    /// Approves a pending withdrawal.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn approve_withdrawal(&self, id: &str) -> ApiResult<Value> {
        self.client
            .post_empty(&format!("/admin/withdrawals/{id}/approve"))
            .await
    }

    /// Rejects a pending withdrawal with a reason shown to the user.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn reject_withdrawal(&self, id: &str, reason: &str) -> ApiResult<Value> {
        self.client
            .post(
                &format!("/admin/withdrawals/{id}/reject"),
                &WithdrawalRejection {
                    reason: reason.to_string(),
                },
            )
            .await
    }

    /// Lists all positions.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn investments(&self) -> ApiResult<Vec<Value>> {
        let data: Value = self.client.get("/admin/investments").await?;
        Ok(take_list(data, "investments"))
    }

    /// Lists all transactions.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn transactions(&self) -> ApiResult<Value> {
        self.client.get("/admin/transactions").await
    }
}
