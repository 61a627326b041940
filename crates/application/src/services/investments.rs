//! Investment plans and positions.

use std::sync::Arc;

use adex_domain::InvestmentOrder;
use serde_json::Value;

use crate::client::SessionHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Investment endpoints.
pub struct InvestmentService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> InvestmentService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Lists the available plans.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn plans(&self) -> ApiResult<Value> {
        self.client.get("/investments/plans").await
    }

    /// Opens a position in a plan.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, e.g. an amount outside the plan limits.
    pub async fn invest(&self, plan_id: impl Into<Value>, amount: f64) -> ApiResult<Value> {
        let order = InvestmentOrder {
            plan_id: plan_id.into(),
            amount,
        };
        self.client.post("/investments/invest", &order).await
    }

    /// Lists the signed-in user's positions.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn my_investments(&self) -> ApiResult<Value> {
        self.client.get("/investments/my-investments").await
    }

    /// Fetches one position.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn investment(&self, id: &str) -> ApiResult<Value> {
        self.client.get(&format!("/investments/{id}")).await
    }

    /// Closes a position.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn stop(&self, id: &str) -> ApiResult<Value> {
        self.client.post_empty(&format!("/investments/{id}/stop")).await
    }
}
