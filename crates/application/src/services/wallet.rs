//! Wallet balance, history, deposits and withdrawals.

use std::sync::Arc;

use adex_domain::{ApiRequest, DepositRequest, TransactionFilter, WithdrawalRequest};
use serde_json::Value;

use super::take_list;
use crate::client::SessionHttpClient;
use crate::error::ApiResult;
use crate::ports::HttpTransport;

/// Wallet endpoints.
pub struct WalletService<T> {
    client: Arc<SessionHttpClient<T>>,
}

impl<T: HttpTransport> WalletService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<SessionHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Fetches balances.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn wallet(&self) -> ApiResult<Value> {
        self.client.get("/wallet").await
    }

    /// Lists transactions, optionally restricted to one type.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn transactions(&self, filter: TransactionFilter) -> ApiResult<Vec<Value>> {
        let mut request = ApiRequest::get("/wallet/transactions");
        if let Some(kind) = filter.query_value() {
            request = request.with_query("type", kind);
        }
        let data: Value = self.client.fetch(request).await?;
        Ok(take_list(data, "transactions"))
    }

    /// Reports an on-chain deposit for crediting.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn deposit(&self, deposit: &DepositRequest) -> ApiResult<Value> {
        self.client.post("/wallet/deposit", deposit).await
    }

    /// Requests a withdrawal.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, e.g. insufficient balance.
    pub async fn withdraw(&self, withdrawal: &WithdrawalRequest) -> ApiResult<Value> {
        self.client.post("/wallet/withdraw", withdrawal).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingTransport, body, client};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn transactions_apply_type_filter() {
        let client = client(RecordingTransport::always(
            200,
            json!({"success": true, "data": {"transactions": [{"id": 1, "type": "profit"}]}}),
        ));
        let wallet = WalletService::new(Arc::clone(&client));

        let profits = wallet.transactions(TransactionFilter::Profit).await.unwrap();
        wallet.transactions(TransactionFilter::All).await.unwrap();

        assert_eq!(profits, vec![json!({"id": 1, "type": "profit"})]);
        let sent = client.transport().sent();
        assert_eq!(sent[0].url.query(), Some("type=profit"));
        assert_eq!(sent[1].url.query(), None);
    }

    #[tokio::test]
    async fn transactions_without_list_are_empty() {
        let client = client(RecordingTransport::always(200, json!({"success": true, "data": {}})));
        let list = WalletService::new(client)
            .transactions(TransactionFilter::All)
            .await
            .unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn withdraw_sends_camel_case_body() {
        let client = client(RecordingTransport::always(200, json!({"success": true})));

        WalletService::new(Arc::clone(&client))
            .withdraw(&WithdrawalRequest {
                amount: 25.0,
                to_address: "0xabc".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            body(&client.transport().sent()[0]),
            json!({"amount": 25.0, "toAddress": "0xabc"})
        );
    }
}
