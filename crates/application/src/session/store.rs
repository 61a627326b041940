//! Persisted session store.
//!
//! The store owns the [`Session`] record and is the only place it changes.
//! Every mutation is written through to a [`KeyValueStorage`] so the session
//! survives restarts, and announced on a broadcast channel.

use std::fmt;
use std::sync::Arc;

use adex_domain::{
    Locale, PersistedSession, RefreshedTokens, Session, UserProfile, token_preview,
};
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use super::{MemoryStorage, SessionEvent};
use crate::error::{ApiError, ApiResult};
use crate::ports::{KeyValueStorage, StorageError};

/// Storage key of the session record.
pub const SESSION_KEY: &str = "auth-storage";

/// Storage key of the locale preference.
pub const LOCALE_KEY: &str = "language";

const EVENT_CAPACITY: usize = 32;

/// What [`SessionStore::apply_refresh`] did with the new tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The tokens were stored.
    Applied,
    /// The session no longer holds the redeemed refresh token, so the tokens
    /// were dropped.
    Superseded,
}

/// Shared, persisted authentication state.
///
/// Cloning is cheap and clones share state, so the same store can be handed
/// to the HTTP client and to the services that call `login`/`logout`.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Rehydrates the store from `storage`.
    ///
    /// A record that cannot be decoded, or that violates the token-pair
    /// invariant, is discarded and the empty session is written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self, StorageError> {
        let raw = storage.get(SESSION_KEY).await?;

        let (session, discarded) = match raw.as_deref().map(serde_json::from_str::<PersistedSession>) {
            None => (Session::default(), false),
            Some(Ok(record)) if record.state.is_consistent() => (record.state, false),
            Some(Ok(_)) => {
                tracing::warn!("discarding persisted session with an incomplete token pair");
                (Session::default(), true)
            }
            Some(Err(error)) => {
                tracing::warn!(%error, "discarding unreadable persisted session");
                (Session::default(), true)
            }
        };

        let store = Self::with_session(storage, session);
        if discarded {
            store.persist(&Session::default()).await?;
        }
        Ok(store)
    }

    /// Creates an empty store backed by [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_session(Arc::new(MemoryStorage::new()), Session::default())
    }

    fn with_session(storage: Arc<dyn KeyValueStorage>, session: Session) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Arc::new(RwLock::new(session)),
            storage,
            events,
        }
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns a copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Returns the access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.session.read().await.access_token.clone()
    }

    /// Returns the refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.session.read().await.refresh_token.clone()
    }

    /// Returns the access and refresh token as one consistent read.
    pub async fn credentials(&self) -> (Option<String>, Option<String>) {
        let session = self.session.read().await;
        (session.access_token.clone(), session.refresh_token.clone())
    }

    /// Returns true once `login` has completed and the session holds both tokens.
    pub async fn is_authenticated(&self) -> bool {
        let session = self.session.read().await;
        session.is_authenticated && session.is_consistent()
    }

    /// Returns the signed-in user.
    pub async fn user(&self) -> Option<UserProfile> {
        self.session.read().await.user.clone()
    }

    /// Stores a freshly issued session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub async fn login(
        &self,
        user: Option<UserProfile>,
        access_token: String,
        refresh_token: String,
    ) -> Result<(), StorageError> {
        let email = user.as_ref().and_then(|u| u.email.clone());
        let next = Session::authenticated(user, access_token, refresh_token);

        let mut session = self.session.write().await;
        self.persist(&next).await?;
        *session = next;
        drop(session);

        tracing::info!(email = email.as_deref().unwrap_or("<unknown>"), "session started");
        self.notify(SessionEvent::LoggedIn { email });
        Ok(())
    }

    /// Clears the session.
    ///
    /// Logging out of an empty session is a no-op and emits no event.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleared session cannot be persisted.
    pub async fn logout(&self) -> Result<(), StorageError> {
        if self.clear().await? {
            tracing::info!("session ended by logout");
            self.notify(SessionEvent::LoggedOut);
        }
        Ok(())
    }

    /// Tears down a session that could not be recovered and broadcasts
    /// [`SessionEvent::SessionExpired`].
    ///
    /// The in-memory session is always cleared. A failure to persist the
    /// cleared record is broadcast as [`SessionEvent::PersistFailed`] rather
    /// than returned, so termination is never skipped.
    pub async fn expire(&self) -> SessionEvent {
        if let Err(error) = self.clear().await {
            self.report_persist_failure(&error);
        }
        tracing::warn!("session expired and was cleared");
        let event = SessionEvent::expired();
        self.notify(event.clone());
        event
    }

    /// Merges `patch` into the stored user.
    ///
    /// Without a stored user the patch becomes the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged profile is invalid or cannot be persisted.
    pub async fn update_user(&self, patch: &Value) -> ApiResult<()> {
        let mut session = self.session.write().await;
        let current = session.user.clone().unwrap_or_default();
        let merged = current
            .merge(patch)
            .map_err(|e| ApiError::Decode(format!("invalid profile update: {e}")))?;

        let next = Session {
            user: Some(merged),
            ..session.clone()
        };
        self.persist(&next).await?;
        *session = next;
        drop(session);

        self.notify(SessionEvent::UserUpdated);
        Ok(())
    }

    /// Stores tokens obtained by redeeming `sent_refresh_token`.
    ///
    /// The tokens are applied only while the session still holds
    /// `sent_refresh_token`; a session cleared or replaced during the refresh
    /// call is left untouched and [`RefreshOutcome::Superseded`] is returned.
    ///
    /// The refresh token is only replaced when the backend rotated it. The
    /// in-memory session is updated even when persisting fails, in which case
    /// [`SessionEvent::PersistFailed`] is broadcast.
    pub async fn apply_refresh(
        &self,
        sent_refresh_token: &str,
        tokens: RefreshedTokens,
    ) -> RefreshOutcome {
        let preview = token_preview(&tokens.access_token);

        let mut session = self.session.write().await;
        if session.refresh_token.as_deref() != Some(sent_refresh_token) {
            drop(session);
            tracing::info!(token = %preview, "session changed during refresh, dropping new token");
            return RefreshOutcome::Superseded;
        }

        session.access_token = Some(tokens.access_token);
        if let Some(refresh_token) = tokens.refresh_token {
            session.refresh_token = Some(refresh_token);
        }
        let persisted = self.persist(&session).await;
        drop(session);

        tracing::info!(token = %preview, "access token refreshed");
        self.notify(SessionEvent::TokenRefreshed {
            token_preview: preview,
        });
        if let Err(error) = persisted {
            self.report_persist_failure(&error);
        }
        RefreshOutcome::Applied
    }

    /// Returns the persisted locale preference, or `en`.
    ///
    /// Read through the storage port on every call, so `set_locale` on any
    /// clone of this store applies to the next request. Whether a change made
    /// by another process is seen depends on the storage; [`MemoryStorage`]
    /// is process-local and the file storage caches the file after its first
    /// read.
    pub async fn locale(&self) -> Locale {
        match self.storage.get(LOCALE_KEY).await {
            Ok(Some(tag)) => Locale::parse(&tag).unwrap_or_else(|error| {
                tracing::debug!(%error, "ignoring stored locale");
                Locale::default()
            }),
            Ok(None) => Locale::default(),
            Err(error) => {
                tracing::warn!(%error, "could not read locale preference");
                Locale::default()
            }
        }
    }

    /// Persists the locale preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be written.
    pub async fn set_locale(&self, locale: &Locale) -> Result<(), StorageError> {
        self.storage
            .set(LOCALE_KEY, locale.as_str().to_string())
            .await
    }

    async fn clear(&self) -> Result<bool, StorageError> {
        let mut session = self.session.write().await;
        let had_state = !session.is_empty();
        *session = Session::default();
        self.persist(&session).await?;
        Ok(had_state)
    }

    async fn persist(&self, session: &Session) -> Result<(), StorageError> {
        let record = PersistedSession::new(session.clone());
        let json = serde_json::to_string(&record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(SESSION_KEY, json).await
    }

    fn report_persist_failure(&self, error: &StorageError) {
        tracing::error!(%error, "session change could not be persisted");
        self.notify(SessionEvent::PersistFailed {
            reason: error.to_string(),
        });
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
