//! Server status translator: the single place linking backend error codes to
//! client-facing field highlighting. Codes arrive normalized to `u16` at the
//! API boundary; an unrecognized code translates to `None` and the caller
//! must treat that as a no-op rather than an error.

use crate::validation::{messages, ValidationOutcome, ValidationType};
use tracing::debug;

/// Map a server-reported error code to a validation outcome. The server path
/// only ever signals negative outcomes, so the state is always `Invalid`.
pub fn translate(code: u16) -> Option<ValidationOutcome> {
    let (validation_type, message) = match code {
        401 => (ValidationType::InvalidCredentials, messages::INVALID_CREDENTIALS),
        402 => (ValidationType::UsernameTaken, messages::USERNAME_TAKEN),
        403 => (ValidationType::RegisteredEmail, messages::REGISTERED_EMAIL),
        405 => (ValidationType::UsernameFormat, messages::INVALID_USERNAME),
        406 => (ValidationType::PasswordFormat, messages::INVALID_PASSWORD),
        407 => (ValidationType::EmailFormat, messages::INVALID_EMAIL),
        408 => (ValidationType::EmailNotRegistered, messages::EMAIL_NOT_REGISTERED),
        409 => (ValidationType::EmptyString, messages::EMPTY_STRING),
        410 => (
            ValidationType::UsernameOrEmailFormat,
            messages::INVALID_USERNAME_OR_EMAIL,
        ),
        411 => (
            ValidationType::UsernameNotRegistered,
            messages::USERNAME_NOT_REGISTERED,
        ),
        412 => (ValidationType::PasswordsMatch, messages::PASSWORDS_DO_NOT_MATCH),
        other => {
            debug!("unrecognized server error code: {other}");
            return None;
        }
    };

    Some(ValidationOutcome::invalid(validation_type, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationState;

    #[test]
    fn translates_invalid_credentials() {
        let outcome = translate(401).expect("401 is a recognized code");
        assert_eq!(outcome.validation_type, ValidationType::InvalidCredentials);
        assert_eq!(outcome.state, ValidationState::Invalid);
        assert_eq!(outcome.message, messages::INVALID_CREDENTIALS);
    }

    #[test]
    fn every_recognized_code_maps_to_a_distinct_type() {
        let codes = [401, 402, 403, 405, 406, 407, 408, 409, 410, 411, 412];
        let mut seen = Vec::new();
        for code in codes {
            let outcome = translate(code).expect("recognized code");
            assert!(
                !seen.contains(&outcome.validation_type),
                "code {code} reuses {:?}",
                outcome.validation_type
            );
            seen.push(outcome.validation_type);
        }
    }

    #[test]
    fn unrecognized_code_is_none() {
        assert!(translate(999).is_none());
        assert!(translate(404).is_none());
        assert!(translate(0).is_none());
    }
}
