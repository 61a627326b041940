//! Adex Domain - Core client types
//!
//! This crate defines the data model shared by the Adex client layers:
//! the persisted session, request and response envelopes, the per-request
//! lifecycle and the bodies sent to the backend.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod locale;
pub mod payloads;
pub mod request;
pub mod response;
pub mod session;
pub mod state;

pub use auth::{LoginCredentials, LoginPayload, RefreshTokenRequest, RefreshedTokens, token_preview};
pub use error::{DomainError, DomainResult};
pub use locale::Locale;
pub use payloads::{
    DepositRequest, InvestmentOrder, PasswordChange, PasswordReset, ProfileUpdate, Registration,
    TransactionFilter, TwoFactorSetup, UserStatusUpdate, WithdrawalRejection, WithdrawalRequest,
};
pub use request::{ApiRequest, HttpMethod, OutboundRequest};
pub use response::{ApiResponse, Envelope, UNAUTHORIZED};
pub use session::{PersistedSession, Session, UserProfile};
pub use state::RequestPhase;
