//! Validation taxonomy shared by client-side rules and the server status
//! translator: constraint types, the tri-state result, and the outcome triple
//! both paths produce.

pub mod rules;
pub mod server;
pub mod store;

pub use self::store::ValidationStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumerated category of a checkable constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationType {
    EmailFormat,
    PasswordFormat,
    UsernameFormat,
    UsernameOrEmailFormat,
    EmptyString,
    PasswordsMatch,
    InvalidCredentials,
    UsernameTaken,
    RegisteredEmail,
    EmailNotRegistered,
    UsernameNotRegistered,
}

impl ValidationType {
    /// Every constraint type, used to pre-populate the store so reads are total.
    pub const ALL: [ValidationType; 11] = [
        ValidationType::EmailFormat,
        ValidationType::PasswordFormat,
        ValidationType::UsernameFormat,
        ValidationType::UsernameOrEmailFormat,
        ValidationType::EmptyString,
        ValidationType::PasswordsMatch,
        ValidationType::InvalidCredentials,
        ValidationType::UsernameTaken,
        ValidationType::RegisteredEmail,
        ValidationType::EmailNotRegistered,
        ValidationType::UsernameNotRegistered,
    ];
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EmailFormat => "email format",
            Self::PasswordFormat => "password format",
            Self::UsernameFormat => "username format",
            Self::UsernameOrEmailFormat => "username or email format",
            Self::EmptyString => "empty string",
            Self::PasswordsMatch => "passwords match",
            Self::InvalidCredentials => "invalid credentials",
            Self::UsernameTaken => "username taken",
            Self::RegisteredEmail => "registered email",
            Self::EmailNotRegistered => "email not registered",
            Self::UsernameNotRegistered => "username not registered",
        };
        write!(f, "{name}")
    }
}

/// Tri-state result of evaluating a constraint. `Inactive` means the
/// constraint has not been evaluated yet, or was explicitly reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationState {
    Valid,
    Invalid,
    #[default]
    Inactive,
}

/// A `(type, state, message)` triple, produced uniformly by client rules and
/// by translating a server status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub validation_type: ValidationType,
    pub state: ValidationState,
    pub message: String,
}

impl ValidationOutcome {
    pub fn valid(validation_type: ValidationType) -> Self {
        Self {
            validation_type,
            state: ValidationState::Valid,
            message: String::new(),
        }
    }

    pub fn invalid(validation_type: ValidationType, message: &str) -> Self {
        Self {
            validation_type,
            state: ValidationState::Invalid,
            message: message.to_string(),
        }
    }
}

/// Fixed message catalog. Messages are not parameterized by the offending
/// value.
pub mod messages {
    pub const INVALID_EMAIL: &str = "email format is not valid";
    pub const INVALID_PASSWORD: &str =
        "at least 8 characters, must contain at least one number, one lowercase and one uppercase letter";
    pub const INVALID_USERNAME: &str =
        "only letters, optionally separated by - or _, are allowed";
    pub const INVALID_USERNAME_OR_EMAIL: &str = "email or username is not valid";
    pub const EMPTY_STRING: &str = "empty string is not allowed";
    pub const PASSWORDS_DO_NOT_MATCH: &str = "passwords do not match";
    pub const INVALID_CREDENTIALS: &str = "invalid credentials provided";
    pub const USERNAME_TAKEN: &str = "username is already taken";
    pub const REGISTERED_EMAIL: &str = "email is already registered";
    pub const EMAIL_NOT_REGISTERED: &str = "email is not registered";
    pub const USERNAME_NOT_REGISTERED: &str = "username is not registered";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_type_once() {
        for (index, validation_type) in ValidationType::ALL.iter().enumerate() {
            assert_eq!(
                ValidationType::ALL
                    .iter()
                    .filter(|other| *other == validation_type)
                    .count(),
                1,
                "duplicate at index {index}"
            );
        }
        assert_eq!(ValidationType::ALL.len(), 11);
    }

    #[test]
    fn default_state_is_inactive() {
        assert_eq!(ValidationState::default(), ValidationState::Inactive);
    }

    #[test]
    fn valid_outcome_has_empty_message() {
        let outcome = ValidationOutcome::valid(ValidationType::EmailFormat);
        assert_eq!(outcome.state, ValidationState::Valid);
        assert!(outcome.message.is_empty());
    }
}
