//! Referral programme endpoints.

use std::sync::Arc;

use serde_json::Value;

use super::take_list;
use crate::client::SessionHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Referral endpoints.
pub struct ReferralService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> ReferralService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Fetches referral counters and the user's code.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn stats(&self) -> ApiResult<Value> {
        self.client.get("/referrals/stats").await
    }

    /// Lists referred users.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn tree(&self) -> ApiResult<Vec<Value>> {
        let tree: Option<Vec<Value>> = self.client.get("/referrals/tree").await?;
        Ok(tree.unwrap_or_default())
    }

    /// Lists referral bonus payments.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn earnings(&self) -> ApiResult<Vec<Value>> {
        let data: Value = self.client.get("/referrals/earnings").await?;
        Ok(take_list(data, "earnings"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingTransport, client, route};
    use adex_domain::ApiResponse;
    use serde_json::json;

    #[tokio::test]
    async fn lists_default_to_empty() {
        let client = client(RecordingTransport::new(|request| {
            let data = match route(request) {
                "/referrals/earnings" => json!({"earnings": [{"amount": 5}]}),
                _ => Value::Null,
            };
            Ok(ApiResponse::json_body(200, &json!({"success": true, "data": data})))
        }));
        let referrals = ReferralService::new(client);

        assert!(referrals.tree().await.unwrap().is_empty());
        assert_eq!(referrals.earnings().await.unwrap(), vec![json!({"amount": 5})]);
    }
}
