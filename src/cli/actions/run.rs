use crate::auth::{AuthClient, AuthConfig, OperationOutcome};
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::session::{Field, FileStorage};
use crate::validation::{rules, store::ValidationMap, ValidationState};
use anyhow::{anyhow, Result};
use serde_json::json;
use std::sync::Arc;
use url::Url;

/// Handle the parsed action: build a client over file-backed storage, run the
/// requested operation and print the resulting session as JSON.
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    let config = AuthConfig::new(Url::parse(&globals.url)?);
    let storage = Arc::new(FileStorage::new(&globals.storage_dir));
    let client = AuthClient::new(config, storage)?;

    let outcome = match action {
        Action::Login {
            email_or_username,
            password,
        } => {
            let session = client.session();
            session.set_field(Field::EmailOrUsername, &email_or_username);
            session.set_field(Field::Password, &password);
            client
                .validation()
                .client_validation(&rules::validate_username_or_email(&email_or_username));
            client
                .validation()
                .client_validation(&rules::validate_empty_string(&password));
            Some(client.login().await)
        }
        Action::Signup {
            username,
            email,
            password,
        } => {
            let session = client.session();
            session.set_field(Field::Username, &username);
            session.set_field(Field::Email, &email);
            session.set_field(Field::Password, &password);
            client
                .validation()
                .client_validation(&rules::validate_username(&username));
            client
                .validation()
                .client_validation(&rules::validate_email(&email));
            client
                .validation()
                .client_validation(&rules::validate_password(&password));
            Some(client.signup().await)
        }
        Action::ChangePassword { password, confirm } => {
            let session = client.session();
            session.set_field(Field::Password, &password);
            session.set_field(Field::Confirm, &confirm);
            client
                .validation()
                .client_validation(&rules::validate_password(&password));
            client
                .validation()
                .client_validation(&rules::validate_passwords_match(&password, &confirm));
            Some(client.change_password().await)
        }
        Action::ForgotPassword { email } => {
            let session = client.session();
            session.set_field(Field::Email, &email);
            client
                .validation()
                .client_validation(&rules::validate_email(&email));
            Some(client.forgot_password().await)
        }
        Action::Logout => {
            client.logout()?;
            None
        }
        Action::Session => None,
    };

    let session = client.session().snapshot();
    let report = json!({
        "outcome": outcome.map(|o| format!("{o:?}")),
        "session": {
            "username": session.username,
            "email": session.email,
            "is_logged_in": session.is_logged_in,
            "is_password_changed": session.is_password_changed,
            "auth_feedback": session.auth_feedback,
        },
        "invalid_fields": invalid_fields(&client.validation().snapshot()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if outcome == Some(OperationOutcome::Failed) {
        return Err(anyhow!(session
            .error
            .unwrap_or_else(|| "operation failed".to_string())));
    }

    Ok(())
}

fn invalid_fields(map: &ValidationMap) -> Vec<serde_json::Value> {
    let mut entries: Vec<_> = map
        .iter()
        .filter(|(_, entry)| entry.state == ValidationState::Invalid)
        .map(|(validation_type, entry)| {
            json!({
                "constraint": validation_type.to_string(),
                "message": entry.message,
            })
        })
        .collect();
    entries.sort_by_key(|entry| entry["constraint"].as_str().map(str::to_string));
    entries
}
