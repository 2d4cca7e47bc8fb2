//! Auth session state: the record of the current user's authentication
//! status, credentials-in-progress, and in-flight operation state. The store
//! is an explicit context object with subscribe/notify semantics; nothing
//! here is ambient or global.

pub mod storage;

pub use self::storage::{
    FileStorage, MemoryStorage, PersistedSession, SessionStorage, StorageError,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Session state mutated only by the auth orchestrator and field edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub email: String,
    pub password: String,
    pub username: String,
    pub email_or_username: String,
    pub confirm: String,
    pub current: String,
    pub token: Option<String>,
    pub is_logged_in: bool,
    pub is_password_changed: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub auth_feedback: Option<String>,
}

/// Credential fields editable by form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    Username,
    EmailOrUsername,
    Confirm,
    Current,
}

/// Pure hydration from the persisted record. Derived flags are always
/// recomputed here, never trusted from storage.
#[must_use]
pub fn hydrate(persisted: Option<PersistedSession>) -> AuthSession {
    match persisted {
        Some(record) => {
            let is_logged_in = !record.token.is_empty();
            AuthSession {
                email: record.email,
                username: record.username,
                token: if is_logged_in {
                    Some(record.token)
                } else {
                    None
                },
                is_logged_in,
                ..AuthSession::default()
            }
        }
        None => AuthSession::default(),
    }
}

/// Shared session store handle.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<AuthSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(AuthSession::default())
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(session: AuthSession) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self { tx: Arc::new(tx) }
    }

    /// Writes one credential field, as an input component would on change.
    pub fn set_field(&self, field: Field, value: &str) {
        debug!("field edit: {field:?}");
        self.tx.send_modify(|session| {
            let slot = match field {
                Field::Email => &mut session.email,
                Field::Password => &mut session.password,
                Field::Username => &mut session.username,
                Field::EmailOrUsername => &mut session.email_or_username,
                Field::Confirm => &mut session.confirm,
                Field::Current => &mut session.current,
            };
            *slot = value.to_string();
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthSession {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.tx.subscribe()
    }

    /// Resets the session to defaults, as on logout.
    pub fn reset(&self) {
        self.tx.send_modify(|session| *session = AuthSession::default());
    }

    pub(crate) fn update(&self, apply: impl FnOnce(&mut AuthSession)) {
        self.tx.send_modify(apply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydrate_without_record_yields_defaults() {
        let session = hydrate(None);
        assert_eq!(session, AuthSession::default());
        assert!(!session.is_logged_in);
    }

    #[test]
    fn hydrate_derives_logged_in_from_token_presence() {
        let session = hydrate(Some(PersistedSession {
            token: "mytoken".to_string(),
            username: "testuser".to_string(),
            email: "testuser@gmail.com".to_string(),
        }));
        assert!(session.is_logged_in);
        assert_eq!(session.token.as_deref(), Some("mytoken"));
        assert_eq!(session.username, "testuser");
        assert_eq!(session.email, "testuser@gmail.com");
        // In-flight state never comes from storage.
        assert!(!session.loading);
        assert!(session.error.is_none());
    }

    #[test]
    fn hydrate_with_empty_token_stays_logged_out() {
        let session = hydrate(Some(PersistedSession {
            token: String::new(),
            username: "testuser".to_string(),
            email: "testuser@gmail.com".to_string(),
        }));
        assert!(!session.is_logged_in);
        assert!(session.token.is_none());
    }

    #[test]
    fn set_field_updates_only_that_field() {
        let store = SessionStore::default();
        store.set_field(Field::Email, "a@b.co");
        store.set_field(Field::Confirm, "secret");
        let session = store.snapshot();
        assert_eq!(session.email, "a@b.co");
        assert_eq!(session.confirm, "secret");
        assert!(session.password.is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let store = SessionStore::default();
        store.set_field(Field::Username, "testuser");
        store.reset();
        assert_eq!(store.snapshot(), AuthSession::default());
    }
}
