//! Request bodies for account, wallet, investment and admin endpoints.
//!
//! Field names follow the backend exactly; some endpoints take camelCase and
//! some snake_case, so renames are per struct.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name
    pub full_name: String,
    /// Login email
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
    /// Code of the referring user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    /// Preferred language
    pub language: String,
}

/// Body of `PATCH /auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Preferred language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Body of `POST /password/change`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Current password
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}

/// Body of `POST /password/reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    /// Token from the reset email
    pub token: String,
    /// Replacement password
    pub new_password: String,
}

/// `data` of `POST /2fa/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorSetup {
    /// Base32 TOTP secret
    pub secret: String,
    /// `otpauth://` URI to render as a QR code
    pub qr_code: String,
}

/// Body of `POST /investments/invest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOrder {
    /// Plan to invest in
    pub plan_id: serde_json::Value,
    /// Amount in account currency
    pub amount: f64,
}

/// Body of `POST /wallet/deposit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    /// Amount sent
    pub amount: f64,
    /// On-chain transaction hash
    pub tx_hash: String,
    /// Sending address
    pub from_address: String,
}

/// Body of `POST /wallet/withdraw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    /// Gross amount; the backend deducts its fee
    pub amount: f64,
    /// Destination address
    pub to_address: String,
}

/// Transaction history filter for `GET /wallet/transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFilter {
    /// No filter
    #[default]
    All,
    /// Deposits
    Deposit,
    /// Withdrawals
    Withdrawal,
    /// Profit accruals
    Profit,
    /// Referral bonuses
    ReferralBonus,
}

impl TransactionFilter {
    /// Returns the `type` query value, or `None` for [`Self::All`].
    #[must_use]
    pub const fn query_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Deposit => Some("deposit"),
            Self::Withdrawal => Some("withdrawal"),
            Self::Profit => Some("profit"),
            Self::ReferralBonus => Some("referral_bonus"),
        }
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value().unwrap_or("all"))
    }
}

impl FromStr for TransactionFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "profit" => Ok(Self::Profit),
            "referral_bonus" => Ok(Self::ReferralBonus),
            other => Err(DomainError::UnknownFilter(other.to_string())),
        }
    }
}

/// Body of `PATCH /admin/users/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserStatusUpdate {
    /// Whether the account may sign in
    pub is_active: bool,
}

/// Body of `POST /admin/withdrawals/{id}/reject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalRejection {
    /// Reason shown to the user
    pub reason: String,
}
