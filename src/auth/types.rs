//! Request/response types for the auth endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub password: String,
    pub email: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChangePasswordRequest {
    pub confirm: String,
    pub password: String,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Success payload for login, signup and change-password.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthSuccess {
    pub token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Success payload for a password-reset request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResetRequestAccepted {
    pub token: String,
    pub message: String,
}

/// Recoverable failure payload: per-field error codes, in server order.
#[derive(Deserialize, Debug)]
pub struct FieldErrors {
    pub errors: Vec<ErrorCode>,
}

/// Fatal failure payload.
#[derive(Deserialize, Debug)]
pub struct FatalError {
    pub error: String,
}

/// A server error code, normalized to an integer at the API boundary. The
/// wire format historically carried codes as JSON strings; both forms are
/// accepted. A non-numeric token normalizes to 0, which no translator entry
/// matches, so it falls through as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub u16);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Text(String),
        }

        let code = match Raw::deserialize(deserializer)? {
            Raw::Number(code) => code,
            Raw::Text(text) => text.trim().parse().unwrap_or(0),
        };
        Ok(ErrorCode(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn error_codes_accept_strings_and_numbers() -> Result<()> {
        let payload: FieldErrors = serde_json::from_str(r#"{"errors":["401",402]}"#)?;
        assert_eq!(payload.errors, vec![ErrorCode(401), ErrorCode(402)]);
        Ok(())
    }

    #[test]
    fn non_numeric_code_normalizes_to_zero() -> Result<()> {
        let payload: FieldErrors = serde_json::from_str(r#"{"errors":["boom"]}"#)?;
        assert_eq!(payload.errors, vec![ErrorCode(0)]);
        Ok(())
    }

    #[test]
    fn auth_success_tolerates_missing_identity_fields() -> Result<()> {
        let payload: AuthSuccess = serde_json::from_str(r#"{"token":"mytoken"}"#)?;
        assert_eq!(payload.token, "mytoken");
        assert!(payload.username.is_empty());
        Ok(())
    }

    #[test]
    fn signup_request_serializes_expected_fields() -> Result<()> {
        let request = SignupRequest {
            password: "TestPassword!22s".to_string(),
            email: "testuser@gmail.com".to_string(),
            username: "testuser".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        assert_eq!(value["username"], "testuser");
        assert_eq!(value["email"], "testuser@gmail.com");
        Ok(())
    }
}
