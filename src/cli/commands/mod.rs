use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("webcom")
        .about("Identity toolkit: login, signup and password flows")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .help("Base URL of the auth API")
                .default_value("http://localhost:8000")
                .env("WEBCOM_URL"),
        )
        .arg(
            Arg::new("storage-dir")
                .short('s')
                .long("storage-dir")
                .help("Directory holding the persisted session record")
                .default_value(".webcom")
                .env("WEBCOM_STORAGE_DIR"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .help("Log verbosity level (0-5 or error, warn, info, debug, trace)")
                .default_value("0")
                .env("WEBCOM_VERBOSITY")
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login").about("Login with email or username").arg(
                Arg::new("email-or-username")
                    .long("email-or-username")
                    .help("Email address or username")
                    .env("WEBCOM_EMAIL_OR_USERNAME")
                    .required(true),
            )
            .arg(
                Arg::new("password")
                    .long("password")
                    .help("Account password")
                    .env("WEBCOM_PASSWORD")
                    .required(true),
            ),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account")
                .arg(
                    Arg::new("username")
                        .long("username")
                        .help("Username")
                        .required(true),
                )
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Email address")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Account password")
                        .env("WEBCOM_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("changepass")
                .about("Change the password of the logged-in account")
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("New password")
                        .env("WEBCOM_PASSWORD")
                        .required(true),
                )
                .arg(
                    Arg::new("confirm")
                        .long("confirm")
                        .help("New password, repeated")
                        .env("WEBCOM_CONFIRM")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("requestpasschange")
                .about("Request a password change link")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Email address")
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the persisted session"))
        .subcommand(Command::new("session").about("Show the current session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_a_subcommand() {
        assert!(new().try_get_matches_from(["webcom"]).is_err());
    }

    #[test]
    fn parses_login_arguments() {
        let matches = new()
            .try_get_matches_from([
                "webcom",
                "login",
                "--email-or-username",
                "testuser",
                "--password",
                "TestPassword!22s",
            ])
            .expect("login should parse");
        let (name, sub) = matches.subcommand().expect("subcommand present");
        assert_eq!(name, "login");
        assert_eq!(
            sub.get_one::<String>("email-or-username").map(String::as_str),
            Some("testuser")
        );
    }

    #[test]
    fn rejects_invalid_log_level() {
        assert!(new()
            .try_get_matches_from(["webcom", "-v", "loud", "logout"])
            .is_err());
    }
}
