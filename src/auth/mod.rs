//! Auth operation orchestrator: drives the four asynchronous operations
//! (login, signup, change-password, request-password-change) as three-phase
//! state machines over HTTP, plus a synchronous logout.
//!
//! Each operation goes `idle -> started -> {success | failed}`. A recoverable
//! failure (HTTP 400) fans the server's per-field error codes through
//! [`crate::validation::server::translate`] into the validation store and
//! leaves the session-level error untouched; a fatal failure (HTTP 500,
//! unexpected status, transport or decode error) sets the session-level error
//! and leaves the validation store untouched. Duplicate submissions race
//! last-issued-wins: every submission bumps a per-operation sequence number
//! and a response that is no longer current is discarded.

pub mod types;

use crate::session::{hydrate, PersistedSession, SessionStorage, SessionStore, StorageError};
use crate::validation::{server, ValidationStore};
use crate::APP_USER_AGENT;
use base64ct::{Base64, Encoding};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};
use self::types::{
    AuthSuccess, ChangePasswordRequest, ErrorCode, FatalError, FieldErrors,
    ForgotPasswordRequest, ResetRequestAccepted, SignupRequest,
};
use url::Url;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl AuthConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// One of the four asynchronous auth operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Signup,
    ChangePassword,
    ForgotPassword,
}

impl Operation {
    fn index(self) -> usize {
        match self {
            Self::Login => 0,
            Self::Signup => 1,
            Self::ChangePassword => 2,
            Self::ForgotPassword => 3,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::ChangePassword => "change password",
            Self::ForgotPassword => "request password change",
        };
        write!(f, "{name}")
    }
}

/// Terminal result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// HTTP 200; session updated and persisted.
    Success,
    /// HTTP 400; per-field codes forwarded to the validation store.
    FieldErrors,
    /// Fatal failure; session-level error set.
    Failed,
    /// A newer submission of the same operation superseded this one; no
    /// state was touched.
    Stale,
}

/// Decoded terminal phase of a network call, before it is applied to state.
enum Phase {
    Auth(AuthSuccess),
    Accepted(ResetRequestAccepted),
    FieldErrors(Vec<ErrorCode>),
}

/// Orchestrator over the session store, validation store and durable storage.
pub struct AuthClient {
    http: Client,
    base_url: Url,
    session: SessionStore,
    validation: ValidationStore,
    storage: Arc<dyn SessionStorage>,
    sequences: [AtomicU64; 4],
}

impl AuthClient {
    /// Builds a client and rehydrates the session from durable storage.
    /// An unreadable record starts the session logged out instead of failing.
    pub fn new(config: AuthConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, AuthError> {
        let persisted = storage.load().unwrap_or_else(|err| {
            error!("failed to read persisted session: {err}");
            None
        });

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            session: SessionStore::new(hydrate(persisted)),
            validation: ValidationStore::new(),
            storage,
            sequences: std::array::from_fn(|_| AtomicU64::new(0)),
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn validation(&self) -> &ValidationStore {
        &self.validation
    }

    /// Login with the session's `email_or_username` and `password` as Basic
    /// credentials on a body-less GET.
    #[instrument(skip(self))]
    pub async fn login(&self) -> OperationOutcome {
        let seq = self.begin(Operation::Login);
        let result = self.try_login().await;
        self.finish(Operation::Login, seq, result)
    }

    /// Signup with the session's `username`, `email` and `password`.
    #[instrument(skip(self))]
    pub async fn signup(&self) -> OperationOutcome {
        let seq = self.begin(Operation::Signup);
        let result = self.try_signup().await;
        self.finish(Operation::Signup, seq, result)
    }

    /// Change the password using the session's token, `password` and
    /// `confirm` fields.
    #[instrument(skip(self))]
    pub async fn change_password(&self) -> OperationOutcome {
        let seq = self.begin(Operation::ChangePassword);
        let result = self.try_change_password().await;
        self.finish(Operation::ChangePassword, seq, result)
    }

    /// Request a password change link for the session's `email`.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self) -> OperationOutcome {
        let seq = self.begin(Operation::ForgotPassword);
        let result = self.try_forgot_password().await;
        self.finish(Operation::ForgotPassword, seq, result)
    }

    /// Synchronous logout: clears durable storage and resets the session to
    /// defaults. No started/terminal phases.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.storage.clear()?;
        self.session.reset();
        debug!("session cleared");
        Ok(())
    }

    async fn try_login(&self) -> Result<Phase, AuthError> {
        let session = self.session.snapshot();
        let credentials = format!("{}:{}", session.email_or_username, session.password);
        let header = format!("Basic {}", Base64::encode_string(credentials.as_bytes()));

        let response = self
            .http
            .get(self.endpoint("/auth/login"))
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        self.read_auth_phase(response).await
    }

    async fn try_signup(&self) -> Result<Phase, AuthError> {
        let session = self.session.snapshot();
        let request = SignupRequest {
            password: session.password,
            email: session.email,
            username: session.username,
        };

        let response = self
            .http
            .post(self.endpoint("/auth/signup"))
            .json(&request)
            .send()
            .await?;

        self.read_auth_phase(response).await
    }

    async fn try_change_password(&self) -> Result<Phase, AuthError> {
        let session = self.session.snapshot();
        let request = ChangePasswordRequest {
            confirm: session.confirm,
            password: session.password,
            token: session.token.unwrap_or_default(),
        };

        let response = self
            .http
            .put(self.endpoint("/auth/changepass"))
            .json(&request)
            .send()
            .await?;

        self.read_auth_phase(response).await
    }

    async fn try_forgot_password(&self) -> Result<Phase, AuthError> {
        let session = self.session.snapshot();
        let request = ForgotPasswordRequest {
            email: session.email,
        };

        let response = self
            .http
            .post(self.endpoint("/auth/requestpasschange"))
            .json(&request)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(Phase::Accepted(response.json().await?)),
            400 => {
                let payload: FieldErrors = response.json().await?;
                Ok(Phase::FieldErrors(payload.errors))
            }
            status => Err(Self::fatal(status, response).await),
        }
    }

    async fn read_auth_phase(&self, response: Response) -> Result<Phase, AuthError> {
        match response.status().as_u16() {
            200 => Ok(Phase::Auth(response.json().await?)),
            400 => {
                let payload: FieldErrors = response.json().await?;
                Ok(Phase::FieldErrors(payload.errors))
            }
            status => Err(Self::fatal(status, response).await),
        }
    }

    /// Decodes a fatal payload, falling back to the status line when the body
    /// is not the expected `{error}` shape.
    async fn fatal(status: u16, response: Response) -> AuthError {
        let message = match response.json::<FatalError>().await {
            Ok(payload) => payload.error,
            Err(_) => format!("unexpected status {status}"),
        };
        AuthError::Server { status, message }
    }

    /// STARTED transition: bump the operation's sequence, raise `loading`,
    /// clear the previous operation-level error.
    fn begin(&self, operation: Operation) -> u64 {
        let seq = self.sequences[operation.index()].fetch_add(1, Ordering::SeqCst) + 1;
        self.session.update(|session| {
            session.loading = true;
            session.error = None;
        });
        debug!("{operation} started, seq {seq}");
        seq
    }

    /// Terminal transition. Exactly one of success, recoverable failure or
    /// fatal failure is applied; a superseded response applies nothing.
    fn finish(
        &self,
        operation: Operation,
        seq: u64,
        result: Result<Phase, AuthError>,
    ) -> OperationOutcome {
        if self.sequences[operation.index()].load(Ordering::SeqCst) != seq {
            debug!("{operation} response superseded, seq {seq} discarded");
            return OperationOutcome::Stale;
        }

        match result {
            Ok(Phase::Auth(auth)) => self.apply_success(operation, &auth),
            Ok(Phase::Accepted(accepted)) => {
                let auth = AuthSuccess {
                    token: accepted.token,
                    username: String::new(),
                    email: String::new(),
                };
                self.session.update(|session| {
                    session.auth_feedback = Some(accepted.message);
                });
                self.apply_success(operation, &auth)
            }
            Ok(Phase::FieldErrors(codes)) => {
                self.session.update(|session| session.loading = false);
                for code in codes {
                    // Unmapped codes are a no-op, not an error.
                    if let Some(outcome) = server::translate(code.0) {
                        self.validation.server_validation(&outcome);
                    }
                }
                debug!("{operation} failed with field errors");
                OperationOutcome::FieldErrors
            }
            Err(err) => {
                error!("{operation} failed: {err}");
                let message = match err {
                    AuthError::Server { message, .. } => message,
                    other => other.to_string(),
                };
                self.session.update(|session| {
                    session.loading = false;
                    session.error = Some(message);
                });
                OperationOutcome::Failed
            }
        }
    }

    fn apply_success(&self, operation: Operation, auth: &AuthSuccess) -> OperationOutcome {
        self.session.update(|session| {
            session.loading = false;
            session.token = Some(auth.token.clone());
            if !auth.username.is_empty() {
                session.username = auth.username.clone();
            }
            if !auth.email.is_empty() {
                session.email = auth.email.clone();
            }
            match operation {
                Operation::Login | Operation::Signup => session.is_logged_in = true,
                Operation::ChangePassword => session.is_password_changed = true,
                Operation::ForgotPassword => {}
            }
        });

        let session = self.session.snapshot();
        let record = PersistedSession {
            token: auth.token.clone(),
            username: session.username,
            email: session.email,
        };
        if let Err(err) = self.storage.save(&record) {
            error!("failed to persist session record: {err}");
            self.session
                .update(|session| session.error = Some(err.to_string()));
            return OperationOutcome::Failed;
        }

        debug!("{operation} succeeded");
        OperationOutcome::Success
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() -> anyhow::Result<()> {
        let config = AuthConfig::new(Url::parse("http://localhost:8000/")?);
        let client = AuthClient::new(config, Arc::new(crate::session::MemoryStorage::new()))?;
        assert_eq!(client.endpoint("/auth/login"), "http://localhost:8000/auth/login");
        Ok(())
    }

    #[test]
    fn operations_have_distinct_sequence_slots() {
        let ops = [
            Operation::Login,
            Operation::Signup,
            Operation::ChangePassword,
            Operation::ForgotPassword,
        ];
        for a in ops {
            for b in ops {
                if a != b {
                    assert_ne!(a.index(), b.index());
                }
            }
        }
    }
}
