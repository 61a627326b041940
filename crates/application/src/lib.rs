//! Adex Application - Session client and backend services
//!
//! This crate holds the session-aware HTTP client, the persisted session
//! store and the typed services built on them. I/O happens through the
//! ports in [`ports`], implemented by the infrastructure layer.

pub mod client;
pub mod config;
pub mod error;
pub mod ports;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;

pub use client::SessionHttpClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_REFRESH_PATH, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiResult, SESSION_EXPIRED_MESSAGE};
pub use ports::{HttpTransport, KeyValueStorage, StorageError, TransportError};
pub use services::{
    AdminService, AuthService, InvestmentService, LoginOutcome, PasswordService, ReferralService,
    TwoFactorService, WalletService,
};
pub use session::{
    MemoryStorage, RefreshOutcome, SessionEvent, SessionExpiredHandler, SessionStore,
};
