//! Session context: who is signed in, observable for as long as the context
//! lives.
//!
//! A [`SessionService`] is created empty around an [`IdentityProvider`].
//! Every auth event replaces the published session; sign-out and failed
//! refreshes clear it. Observers hold a [`watch::Receiver`] and see each
//! change in order.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::ports::{AuthError, IdentityProvider};
use super::{
    AccessToken, AuthSession, AuthValidationError, Error, Identity, Registration,
    RegistrationForm, SignInCredentials, SignUpOutcome,
};

impl From<AuthValidationError> for AuthError {
    fn from(value: AuthValidationError) -> Self {
        AuthError::validation(value.to_string())
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        match &value {
            AuthError::InvalidCredentials | AuthError::SessionExpired => {
                Error::unauthorized(value.to_string())
            }
            AuthError::DuplicateAccount { .. } => Error::conflict(value.to_string()),
            AuthError::WeakPassword { .. }
            | AuthError::InvalidEmail { .. }
            | AuthError::Validation { .. } => Error::invalid_request(value.to_string()),
            AuthError::Transport { .. } | AuthError::Timeout { .. } => {
                Error::service_unavailable("Authentication service is unavailable")
            }
        }
    }
}

/// Explicit session context over an identity provider.
pub struct SessionService {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<Option<AuthSession>>,
}

impl SessionService {
    /// Create an empty context.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(None);
        Self { provider, state }
    }

    /// Create a context that already holds `session`, for example one
    /// restored from a cookie.
    pub fn restore(provider: Arc<dyn IdentityProvider>, session: AuthSession) -> Self {
        let (state, _) = watch::channel(Some(session));
        Self { provider, state }
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.state.subscribe()
    }

    /// Identity of the signed-in user, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.state
            .borrow()
            .as_ref()
            .map(|session| session.identity.clone())
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.state
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Authenticate with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let credentials = SignInCredentials::try_from_parts(email, password)?;
        let session = self.provider.sign_in(&credentials).await?;
        info!(user_id = %session.identity.id, role = %session.identity.role, "signed in");
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Register a new account with the requested role. The context is signed
    /// in only when the provider issued a session.
    pub async fn sign_up(&self, form: RegistrationForm<'_>) -> Result<SignUpOutcome, AuthError> {
        let registration = Registration::try_from_form(form)?;
        let outcome = self.provider.sign_up(&registration).await?;
        let identity = outcome.identity();
        info!(user_id = %identity.id, role = %identity.role, "account created");
        match outcome.session() {
            Some(session) => {
                self.state.send_replace(Some(session.clone()));
            }
            None => debug!(user_id = %identity.id, "no session until the email is confirmed"),
        }
        Ok(outcome)
    }

    /// End the session. Always succeeds locally; a failed remote revocation
    /// is logged and otherwise ignored.
    pub async fn sign_out(&self) {
        let Some(session) = self.state.send_replace(None) else {
            debug!("sign-out without an active session");
            return;
        };
        match self.provider.sign_out(&session.access_token).await {
            Ok(()) => info!(user_id = %session.identity.id, "signed out"),
            Err(error) => warn!(
                user_id = %session.identity.id,
                %error,
                "remote sign-out failed; local session cleared anyway"
            ),
        }
    }

    /// Re-resolve the identity behind the current token. Any failure clears
    /// the session.
    pub async fn refresh(&self) -> Result<Identity, AuthError> {
        let Some(token) = self.access_token() else {
            return Err(AuthError::session_expired());
        };
        match self.provider.identity(&token).await {
            Ok(identity) => {
                self.state.send_replace(Some(AuthSession {
                    identity: identity.clone(),
                    access_token: token,
                }));
                Ok(identity)
            }
            Err(error) => {
                warn!(%error, "session refresh failed; clearing session");
                self.state.send_replace(None);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "session_service_tests.rs"]
mod tests;
