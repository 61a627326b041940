//! Typed wrappers over the backend endpoints.
//!
//! Each service borrows a shared [`SessionHttpClient`](crate::SessionHttpClient),
//! unwraps the response envelope and hands back its payload. Payloads the
//! client never interprets stay as [`serde_json::Value`].

mod account;
mod admin;
mod auth;
mod investments;
mod referrals;
mod wallet;

pub use account::{PasswordService, TwoFactorService};
pub use admin::AdminService;
pub use auth::{AuthService, LoginOutcome, VERIFY_EMAIL_TIMEOUT};
pub use investments::InvestmentService;
pub use referrals::ReferralService;
pub use wallet::WalletService;

use serde_json::Value;

/// Takes the array under `key` out of an object payload.
///
/// A missing key or a non-array value yields an empty list.
fn take_list(mut data: Value, key: &str) -> Vec<Value> {
    match data.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn take_list_tolerates_missing_keys() {
        assert_eq!(take_list(json!({"items": [1, 2]}), "items"), vec![json!(1), json!(2)]);
        assert!(take_list(json!({"items": null}), "items").is_empty());
        assert!(take_list(json!(null), "items").is_empty());
    }
}
