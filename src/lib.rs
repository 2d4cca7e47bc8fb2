//! Identity toolkit core: a validation-and-authentication state engine for
//! login, signup, password change and password-reset-request flows.
//!
//! Two cooperating state containers — [`session::SessionStore`] and
//! [`validation::store::ValidationStore`] — share one taxonomy of validation
//! outcomes. Synchronous rule checks ([`validation::rules`]) and server error
//! codes ([`validation::server`]) both produce [`validation::ValidationOutcome`]
//! values, so client- and server-derived results stay uniform. The
//! [`auth::AuthClient`] orchestrates the asynchronous operations against the
//! auth API and fans recoverable server errors out into the validation store.

pub mod auth;
pub mod cli;
pub mod session;
pub mod validation;

pub(crate) static APP_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
