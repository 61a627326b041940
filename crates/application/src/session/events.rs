//! Session lifecycle notifications.

use crate::error::SESSION_EXPIRED_MESSAGE;

/// Events broadcast by the session store.
///
/// Navigation is left to subscribers: the client never decides where the
/// application goes after a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user signed in.
    LoggedIn {
        /// Email of the user, if the backend sent one.
        email: Option<String>,
    },
    /// The user signed out.
    LoggedOut,
    /// A new access token was stored after a refresh.
    TokenRefreshed {
        /// Preview of the new token.
        token_preview: String,
    },
    /// The session could not be recovered and was cleared.
    SessionExpired {
        /// Message to show the user.
        message: String,
    },
    /// The stored user profile changed.
    UserUpdated,
    /// A session change is held in memory but could not be written to
    /// storage, so the persisted session is stale.
    PersistFailed {
        /// Storage error message.
        reason: String,
    },
}

impl SessionEvent {
    /// Creates the expiry event with the standard message.
    #[must_use]
    pub fn expired() -> Self {
        Self::SessionExpired {
            message: SESSION_EXPIRED_MESSAGE.to_string(),
        }
    }

    /// Returns true for events that end the session.
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        matches!(self, Self::LoggedOut | Self::SessionExpired { .. })
    }
}

/// Caller-supplied reaction to an unrecoverable session, typically
/// navigating to the sign-in entry point.
pub trait SessionExpiredHandler: Send + Sync {
    /// Called once per terminated session, after the store was cleared.
    fn on_session_expired(&self, event: &SessionEvent);
}

impl<F> SessionExpiredHandler for F
where
    F: Fn(&SessionEvent) + Send + Sync,
{
    fn on_session_expired(&self, event: &SessionEvent) {
        self(event);
    }
}
