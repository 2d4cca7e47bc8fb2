use crate::cli::actions::Action;
use anyhow::{Context, Result};

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .map(String::to_string)
        .with_context(|| format!("missing required argument: --{name}"))
}

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("a subcommand is required")?;

    match name {
        "login" => Ok(Action::Login {
            email_or_username: required(sub, "email-or-username")?,
            password: required(sub, "password")?,
        }),
        "signup" => Ok(Action::Signup {
            username: required(sub, "username")?,
            email: required(sub, "email")?,
            password: required(sub, "password")?,
        }),
        "changepass" => Ok(Action::ChangePassword {
            password: required(sub, "password")?,
            confirm: required(sub, "confirm")?,
        }),
        "requestpasschange" => Ok(Action::ForgotPassword {
            email: required(sub, "email")?,
        }),
        "logout" => Ok(Action::Logout),
        "session" => Ok(Action::Session),
        _ => anyhow::bail!("unknown subcommand: {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn dispatches_signup() -> Result<()> {
        let matches = commands::new().try_get_matches_from([
            "webcom",
            "signup",
            "--username",
            "testuser",
            "--email",
            "testuser@gmail.com",
            "--password",
            "TestPassword!22s",
        ])?;
        match handler(&matches)? {
            Action::Signup {
                username, email, ..
            } => {
                assert_eq!(username, "testuser");
                assert_eq!(email, "testuser@gmail.com");
            }
            other => anyhow::bail!("unexpected action: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn dispatches_logout() -> Result<()> {
        let matches = commands::new().try_get_matches_from(["webcom", "logout"])?;
        assert!(matches!(handler(&matches)?, Action::Logout));
        Ok(())
    }
}
