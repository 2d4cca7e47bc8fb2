pub mod run;

#[derive(Debug)]
pub enum Action {
    Login {
        email_or_username: String,
        password: String,
    },
    Signup {
        username: String,
        email: String,
        password: String,
    },
    ChangePassword {
        password: String,
        confirm: String,
    },
    ForgotPassword {
        email: String,
    },
    Logout,
    Session,
}
