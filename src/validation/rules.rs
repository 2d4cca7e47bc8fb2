//! Client-side validation rule catalog: one pure predicate per constraint
//! type, each returning a [`ValidationOutcome`].
//!
//! Patterns deliberately match a substring anywhere in the value rather than
//! anchoring to the full string; callers relying on these rules get the
//! permissive semantics the product ships with.

use crate::validation::{messages, ValidationOutcome, ValidationType};
use regex::Regex;

fn email_shaped(value: &str) -> bool {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+")
        .is_ok_and(|re| re.is_match(value))
}

fn username_shaped(value: &str) -> bool {
    Regex::new(r"[a-zA-Z]+([-_][a-zA-Z]+)*").is_ok_and(|re| re.is_match(value))
}

/// VALID iff an email-shaped substring occurs anywhere in the value.
pub fn validate_email(value: &str) -> ValidationOutcome {
    if email_shaped(value) {
        ValidationOutcome::valid(ValidationType::EmailFormat)
    } else {
        ValidationOutcome::invalid(ValidationType::EmailFormat, messages::INVALID_EMAIL)
    }
}

/// VALID iff the value contains at least one digit, one lowercase and one
/// uppercase letter, and is at least 8 characters long. The four conditions
/// are independent; nothing is anchored.
pub fn validate_password(value: &str) -> ValidationOutcome {
    let strong = value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase());

    if strong {
        ValidationOutcome::valid(ValidationType::PasswordFormat)
    } else {
        ValidationOutcome::invalid(ValidationType::PasswordFormat, messages::INVALID_PASSWORD)
    }
}

/// VALID iff a run of letters, optionally with interior `-` or `_`, occurs
/// anywhere in the value.
pub fn validate_username(value: &str) -> ValidationOutcome {
    if username_shaped(value) {
        ValidationOutcome::valid(ValidationType::UsernameFormat)
    } else {
        ValidationOutcome::invalid(ValidationType::UsernameFormat, messages::INVALID_USERNAME)
    }
}

/// VALID iff the value matches the email pattern or the username pattern.
pub fn validate_username_or_email(value: &str) -> ValidationOutcome {
    if email_shaped(value) || username_shaped(value) {
        ValidationOutcome::valid(ValidationType::UsernameOrEmailFormat)
    } else {
        ValidationOutcome::invalid(
            ValidationType::UsernameOrEmailFormat,
            messages::INVALID_USERNAME_OR_EMAIL,
        )
    }
}

/// INVALID iff the value is empty. Callers interpret INVALID as "field is
/// blank", an error condition.
pub fn validate_empty_string(value: &str) -> ValidationOutcome {
    if value.is_empty() {
        ValidationOutcome::invalid(ValidationType::EmptyString, messages::EMPTY_STRING)
    } else {
        ValidationOutcome::valid(ValidationType::EmptyString)
    }
}

/// INVALID iff the password is empty or differs from the confirmation.
pub fn validate_passwords_match(password: &str, confirm: &str) -> ValidationOutcome {
    if password.is_empty() || password != confirm {
        ValidationOutcome::invalid(
            ValidationType::PasswordsMatch,
            messages::PASSWORDS_DO_NOT_MATCH,
        )
    } else {
        ValidationOutcome::valid(ValidationType::PasswordsMatch)
    }
}
