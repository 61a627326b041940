//! Authenticated session state.
//!
//! A [`Session`] is the client-side record of who is signed in and which
//! credentials to present. It is persisted as a single JSON record and
//! rehydrated on start-up.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in user as returned by the backend.
///
/// Only the fields the client reads are typed; everything else the backend
/// sends is preserved in `extra` and written back on persist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Login email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Role, `admin` for console access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Preferred language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Whether two-factor authentication is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_factor_enabled: Option<bool>,
    /// Remaining backend fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Returns true if the user may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// Shallow-merges `patch` into this profile.
    ///
    /// Keys present in `patch` overwrite existing ones; other keys are kept.
    /// A non-object patch leaves the profile untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged object no longer decodes as a profile,
    /// e.g. when `two_factor_enabled` is patched with a string.
    pub fn merge(&self, patch: &Value) -> Result<Self, serde_json::Error> {
        let Value::Object(patch) = patch else {
            return Ok(self.clone());
        };

        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged))
    }
}

/// Persisted authentication state.
///
/// Serialized with the same camelCase keys the web front end uses, so a
/// record written by either client can be read by the other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Signed-in user
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Short-lived API credential
    #[serde(default)]
    pub access_token: Option<String>,
    /// Credential exchanged for a new access token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Whether `login` completed
    #[serde(default)]
    pub is_authenticated: bool,
}

impl Session {
    /// Creates an authenticated session.
    #[must_use]
    pub const fn authenticated(
        user: Option<UserProfile>,
        access_token: String,
        refresh_token: String,
    ) -> Self {
        Self {
            user,
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            is_authenticated: true,
        }
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.access_token.is_none()
            && self.refresh_token.is_none()
            && !self.is_authenticated
    }

    /// Checks the token-pair invariant.
    ///
    /// Both tokens must be present or both absent, and an authenticated
    /// session must hold both. Anything else must be logged out.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        match (&self.access_token, &self.refresh_token) {
            (Some(_), Some(_)) => true,
            (None, None) => !self.is_authenticated,
            _ => false,
        }
    }
}

/// Envelope used when persisting the session.
///
/// Mirrors the `{ state, version }` layout of the web client's storage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedSession {
    /// The session fields
    pub state: Session,
    /// Layout version
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    /// Current layout version.
    pub const VERSION: u32 = 0;

    /// Wraps a session for storage.
    #[must_use]
    pub const fn new(state: Session) -> Self {
        Self {
            state,
            version: Self::VERSION,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_session_is_empty_and_consistent() {
        let session = Session::default();
        assert!(session.is_empty());
        assert!(session.is_consistent());
    }

    #[test]
    fn half_a_token_pair_is_inconsistent() {
        let session = Session {
            access_token: Some("A1".to_string()),
            ..Session::default()
        };
        assert!(!session.is_consistent());

        let session = Session {
            refresh_token: Some("R1".to_string()),
            is_authenticated: true,
            ..Session::default()
        };
        assert!(!session.is_consistent());
    }

    #[test]
    fn authenticated_flag_without_tokens_is_inconsistent() {
        let session = Session {
            is_authenticated: true,
            ..Session::default()
        };
        assert!(!session.is_consistent());
    }

    #[test]
    fn persisted_layout_uses_camel_case() {
        let session = Session::authenticated(None, "A1".to_string(), "R1".to_string());
        let value = serde_json::to_value(PersistedSession::new(session)).unwrap();
        assert_eq!(
            value,
            json!({
                "state": {
                    "user": null,
                    "accessToken": "A1",
                    "refreshToken": "R1",
                    "isAuthenticated": true
                },
                "version": 0
            })
        );
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 7,
            "email": "ada@example.com",
            "referral_code": "ABCD1234"
        }))
        .unwrap();
        assert_eq!(profile.extra.get("referral_code"), Some(&json!("ABCD1234")));

        let round = serde_json::to_value(&profile).unwrap();
        assert_eq!(round["referral_code"], json!("ABCD1234"));
    }

    #[test]
    fn merge_overwrites_only_patched_keys() {
        let profile: UserProfile = serde_json::from_value(json!({
            "email": "ada@example.com",
            "full_name": "Ada",
            "phone": "123"
        }))
        .unwrap();

        let merged = profile
            .merge(&json!({"full_name": "Ada Lovelace", "language": "fr"}))
            .unwrap();

        assert_eq!(merged.email.as_deref(), Some("ada@example.com"));
        assert_eq!(merged.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(merged.language.as_deref(), Some("fr"));
        assert_eq!(merged.extra.get("phone"), Some(&json!("123")));
    }

    #[test]
    fn merge_rejects_mistyped_fields() {
        let profile = UserProfile::default();
        assert!(profile.merge(&json!({"two_factor_enabled": "yes"})).is_err());
    }

    #[test]
    fn admin_role_is_detected() {
        let profile = UserProfile {
            role: Some("admin".to_string()),
            ..UserProfile::default()
        };
        assert!(profile.is_admin());
        assert!(!UserProfile::default().is_admin());
    }
}
