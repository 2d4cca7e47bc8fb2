//! Per-field validation store. Every enumerated [`ValidationType`] is
//! pre-populated to `Inactive` at initialization so every read is total;
//! sparse lookups never occur. Subscribers observe the full map through a
//! watch channel.

use crate::validation::{ValidationOutcome, ValidationState, ValidationType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// State recorded per constraint type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
    pub state: ValidationState,
    pub message: String,
}

pub type ValidationMap = HashMap<ValidationType, FieldValidation>;

/// Shared validation store handle. Cloning shares the same underlying map;
/// ownership is explicit rather than ambient.
#[derive(Debug, Clone)]
pub struct ValidationStore {
    tx: Arc<watch::Sender<ValidationMap>>,
}

impl Default for ValidationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationStore {
    /// Creates a store with every constraint type set to `Inactive`.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(initial_map());
        Self { tx: Arc::new(tx) }
    }

    /// Upserts the entry for a client-derived outcome.
    pub fn client_validation(&self, outcome: &ValidationOutcome) {
        debug!(
            "client validation: {} -> {:?}",
            outcome.validation_type, outcome.state
        );
        self.apply(outcome);
    }

    /// Upserts the entry for a server-derived outcome. Same transition as the
    /// client path; the two are kept distinct at the call site only.
    pub fn server_validation(&self, outcome: &ValidationOutcome) {
        debug!(
            "server validation: {} -> {:?}",
            outcome.validation_type, outcome.state
        );
        self.apply(outcome);
    }

    /// Sets the entry back to `{ Inactive, "" }`. Idempotent; resetting an
    /// already-inactive entry is a no-op transition to the same value.
    pub fn reset(&self, validation_type: ValidationType) {
        self.tx.send_modify(|map| {
            map.insert(validation_type, FieldValidation::default());
        });
    }

    /// Re-initializes every entry to `Inactive`, as at form mount.
    pub fn reset_all(&self) {
        self.tx.send_modify(|map| {
            *map = initial_map();
        });
    }

    /// Total read: every enumerated type has an entry.
    #[must_use]
    pub fn get(&self, validation_type: ValidationType) -> FieldValidation {
        self.tx
            .borrow()
            .get(&validation_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of the whole map.
    #[must_use]
    pub fn snapshot(&self) -> ValidationMap {
        self.tx.borrow().clone()
    }

    /// True if any entry is currently `Invalid`.
    #[must_use]
    pub fn has_invalid(&self) -> bool {
        self.tx
            .borrow()
            .values()
            .any(|entry| entry.state == ValidationState::Invalid)
    }

    /// Subscribes to map changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ValidationMap> {
        self.tx.subscribe()
    }

    fn apply(&self, outcome: &ValidationOutcome) {
        self.tx.send_modify(|map| {
            map.insert(
                outcome.validation_type,
                FieldValidation {
                    state: outcome.state,
                    message: outcome.message.clone(),
                },
            );
        });
    }
}

fn initial_map() -> ValidationMap {
    ValidationType::ALL
        .iter()
        .map(|validation_type| (*validation_type, FieldValidation::default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::messages;

    #[test]
    fn reads_are_total_after_init() {
        let store = ValidationStore::new();
        for validation_type in ValidationType::ALL {
            let entry = store.get(validation_type);
            assert_eq!(entry.state, ValidationState::Inactive);
            assert!(entry.message.is_empty());
        }
    }

    #[test]
    fn upsert_then_read_back() {
        let store = ValidationStore::new();
        store.client_validation(&ValidationOutcome::invalid(
            ValidationType::EmailFormat,
            messages::INVALID_EMAIL,
        ));
        let entry = store.get(ValidationType::EmailFormat);
        assert_eq!(entry.state, ValidationState::Invalid);
        assert_eq!(entry.message, messages::INVALID_EMAIL);
    }

    #[test]
    fn later_outcome_for_same_type_overwrites_earlier() {
        let store = ValidationStore::new();
        store.server_validation(&ValidationOutcome::invalid(
            ValidationType::PasswordFormat,
            "first",
        ));
        store.server_validation(&ValidationOutcome::invalid(
            ValidationType::PasswordFormat,
            "second",
        ));
        assert_eq!(store.get(ValidationType::PasswordFormat).message, "second");
    }

    #[test]
    fn reset_is_idempotent() {
        let store = ValidationStore::new();
        store.client_validation(&ValidationOutcome::invalid(
            ValidationType::EmptyString,
            messages::EMPTY_STRING,
        ));
        store.reset(ValidationType::EmptyString);
        let once = store.get(ValidationType::EmptyString);
        store.reset(ValidationType::EmptyString);
        let twice = store.get(ValidationType::EmptyString);
        assert_eq!(once, twice);
        assert_eq!(once.state, ValidationState::Inactive);
    }

    #[test]
    fn reset_all_clears_every_entry() {
        let store = ValidationStore::new();
        store.client_validation(&ValidationOutcome::invalid(
            ValidationType::UsernameTaken,
            messages::USERNAME_TAKEN,
        ));
        store.reset_all();
        assert!(!store.has_invalid());
    }

    #[test]
    fn subscribers_observe_updates() {
        let store = ValidationStore::new();
        let rx = store.subscribe();
        store.client_validation(&ValidationOutcome::invalid(
            ValidationType::EmailFormat,
            messages::INVALID_EMAIL,
        ));
        let entry = rx.borrow().get(&ValidationType::EmailFormat).cloned();
        assert_eq!(
            entry.map(|e| e.state),
            Some(ValidationState::Invalid)
        );
    }
}
