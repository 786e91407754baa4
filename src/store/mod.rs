//! Session storage. The [`TokenStore`] trait is the only place the access token,
//! refresh token and user profile live; every other component reads through it
//! for the duration of one operation and never keeps a second copy.
//!
//! Writes are best-effort: a durable backend that fails to persist logs the
//! failure and keeps serving the in-memory value, so callers never see storage
//! errors.

mod file;

pub use file::FileTokenStore;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{PoisonError, RwLock},
};

/// Coarse permission class of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Administrator,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile returned by the backend alongside the token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default = "default_approved")]
    pub is_approved: bool,
}

const fn default_approved() -> bool {
    true
}

/// The authenticated identity bound to this client.
#[derive(Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

/// Narrow read/write contract over the stored session.
pub trait TokenStore: Send + Sync {
    /// Current session, if any.
    fn get(&self) -> Option<Session>;

    /// Replace the stored session; all three fields are written together.
    fn set(&self, access_token: SecretString, refresh_token: SecretString, user: User);

    /// Remove the stored session. Idempotent.
    fn clear(&self);

    /// Presence check only; validity is decided by the next request.
    fn is_authenticated(&self) -> bool {
        self.get()
            .is_some_and(|session| !session.access_token.expose_secret().is_empty())
    }
}

/// Process-local store, used for ephemeral sessions and in tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    session: RwLock<Option<Session>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, access_token: SecretString, refresh_token: SecretString, user: User) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(Session {
            access_token,
            refresh_token,
            user,
        });
    }

    fn clear(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
pub(crate) fn student(username: &str) -> User {
    User {
        username: username.to_string(),
        email: format!("{username}@college.edu"),
        role: Role::Student,
        is_approved: true,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn set_then_clear_toggles_authentication() {
        let store = MemoryTokenStore::new();
        assert!(!store.is_authenticated());

        store.set(
            SecretString::from("A1"),
            SecretString::from("R1"),
            student("alex"),
        );
        assert!(store.is_authenticated());

        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.get().is_none());

        // clearing twice is fine
        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn empty_access_token_is_not_authenticated() {
        let store = MemoryTokenStore::new();
        store.set(SecretString::from(""), SecretString::from("R1"), student("alex"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn set_replaces_whole_session() {
        let store = MemoryTokenStore::new();
        store.set(SecretString::from("A1"), SecretString::from("R1"), student("alex"));
        store.set(SecretString::from("A2"), SecretString::from("R2"), student("sam"));

        let session = store.get().expect("session stored");
        assert_eq!(session.access_token.expose_secret(), "A2");
        assert_eq!(session.refresh_token.expose_secret(), "R2");
        assert_eq!(session.user.username, "sam");
    }

    #[test]
    fn session_debug_hides_tokens() {
        let session = Session {
            access_token: SecretString::from("A1"),
            refresh_token: SecretString::from("R1"),
            user: student("alex"),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("A1"));
        assert!(!rendered.contains("R1"));
        assert!(rendered.contains("alex"));
    }

    #[test]
    fn role_wire_format() {
        let role: Role = serde_json::from_str("\"administrator\"").expect("role parses");
        assert_eq!(role, Role::Administrator);
        assert_eq!(Role::Student.to_string(), "student");
    }

    #[test]
    fn user_defaults_missing_fields() {
        let user: User =
            serde_json::from_str(r#"{"username":"alex","role":"student"}"#).expect("user parses");
        assert!(user.is_approved);
        assert!(user.email.is_empty());
    }
}
