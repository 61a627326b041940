//! Per-request lifecycle.
//!
//! Every call through the session client walks this state machine:
//!
//! ```text
//! Issued ──2xx──────────────────────────────> Done
//!   │ ──401, not retried──> Refreshing ──ok──> Reissued ──2xx──> Done
//!   │                           │                  └──other──> Failed
//!   │                           ├──fail──> Unrecoverable ──> Failed
//!   │                           └──session replaced──────────> Failed
//!   └──other / no response──────────────────> Failed
//! ```

use std::fmt;

use crate::response::UNAUTHORIZED;

/// Where a request is in its attempt chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// First attempt sent.
    #[default]
    Issued,
    /// First attempt got a 401; obtaining a new access token.
    Refreshing,
    /// Sent again with the refreshed token.
    Reissued,
    /// The refresh could not produce a token; the session is torn down.
    Unrecoverable,
    /// Completed with a 2xx response.
    Done,
    /// Completed with an error.
    Failed,
}

impl RequestPhase {
    /// Advances on an HTTP response.
    ///
    /// `retried` is the request's retry marker; a request that already
    /// carries it never enters `Refreshing` again.
    #[must_use]
    pub const fn on_response(self, status: u16, retried: bool) -> Self {
        let success = status >= 200 && status < 300;
        match self {
            Self::Issued | Self::Reissued if success => Self::Done,
            Self::Issued if status == UNAUTHORIZED && !retried => Self::Refreshing,
            Self::Issued | Self::Reissued => Self::Failed,
            other => other,
        }
    }

    /// Advances when no response was received at all.
    #[must_use]
    pub const fn on_transport_error(self) -> Self {
        match self {
            Self::Issued | Self::Reissued | Self::Refreshing => Self::Failed,
            other => other,
        }
    }

    /// Advances on the outcome of a token refresh.
    #[must_use]
    pub const fn on_refresh(self, refreshed: bool) -> Self {
        match self {
            Self::Refreshing if refreshed => Self::Reissued,
            Self::Refreshing => Self::Unrecoverable,
            other => other,
        }
    }

    /// Abandons a refresh whose session was logged out or replaced while it
    /// was in flight. The current session is left alone.
    #[must_use]
    pub const fn on_session_replaced(self) -> Self {
        match self {
            Self::Refreshing => Self::Failed,
            other => other,
        }
    }

    /// Leaves `Unrecoverable` once the session has been torn down.
    #[must_use]
    pub const fn on_session_cleared(self) -> Self {
        match self {
            Self::Unrecoverable => Self::Failed,
            other => other,
        }
    }

    /// Returns true for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns the phase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Refreshing => "refreshing",
            Self::Reissued => "reissued",
            Self::Unrecoverable => "unrecoverable",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_on_first_attempt() {
        assert_eq!(RequestPhase::Issued.on_response(200, false), RequestPhase::Done);
    }

    #[test]
    fn first_unauthorized_refreshes() {
        let phase = RequestPhase::Issued.on_response(401, false);
        assert_eq!(phase, RequestPhase::Refreshing);
        let phase = phase.on_refresh(true);
        assert_eq!(phase, RequestPhase::Reissued);
        assert_eq!(phase.on_response(200, true), RequestPhase::Done);
    }

    #[test]
    fn second_unauthorized_fails() {
        assert_eq!(RequestPhase::Reissued.on_response(401, true), RequestPhase::Failed);
    }

    #[test]
    fn pre_marked_request_does_not_refresh() {
        assert_eq!(RequestPhase::Issued.on_response(401, true), RequestPhase::Failed);
    }

    #[test]
    fn failed_refresh_is_unrecoverable_then_failed() {
        let phase = RequestPhase::Refreshing.on_refresh(false);
        assert_eq!(phase, RequestPhase::Unrecoverable);
        assert!(!phase.is_terminal());
        assert_eq!(phase.on_session_cleared(), RequestPhase::Failed);
    }

    #[test]
    fn replaced_session_fails_without_teardown() {
        let phase = RequestPhase::Refreshing.on_session_replaced();
        assert_eq!(phase, RequestPhase::Failed);
        assert!(phase.is_terminal());
        assert_eq!(RequestPhase::Issued.on_session_replaced(), RequestPhase::Issued);
    }

    #[test]
    fn other_errors_fail_without_retry() {
        assert_eq!(RequestPhase::Issued.on_response(403, false), RequestPhase::Failed);
        assert_eq!(RequestPhase::Issued.on_response(500, false), RequestPhase::Failed);
        assert_eq!(RequestPhase::Issued.on_transport_error(), RequestPhase::Failed);
    }

    #[test]
    fn terminal_states_are_sticky() {
        assert_eq!(RequestPhase::Done.on_response(401, false), RequestPhase::Done);
        assert_eq!(RequestPhase::Failed.on_refresh(true), RequestPhase::Failed);
    }
}
