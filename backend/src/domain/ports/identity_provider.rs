//! Driven port for the hosted authentication provider.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    AccessToken, AuthSession, Identity, Registration, SignInCredentials, SignUpOutcome,
};

define_port_error! {
    /// Expected authentication failures.
    pub enum AuthError {
        /// Unknown email or wrong password.
        InvalidCredentials => "Invalid login credentials",
        /// An account already exists for the email.
        DuplicateAccount { email: String } => "An account already exists for {email}",
        /// The provider's password policy refused the password.
        WeakPassword { message: String } => "{message}",
        /// The provider refused the email address.
        InvalidEmail { message: String } => "{message}",
        /// Local form validation failed before any remote call.
        Validation { message: String } => "{message}",
        /// The access token is no longer valid.
        SessionExpired => "Your session has expired. Please sign in again.",
        Transport { message: String } => "authentication service unreachable: {message}"; transient,
        Timeout { message: String } => "authentication service timed out: {message}"; transient,
    }
}

/// Sign-in, sign-up and token introspection against the auth provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, AuthError>;

    /// Create an account carrying the requested role. Providers that require
    /// email confirmation answer without a session.
    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AuthError>;

    /// Revoke `token`. Revoking an unknown or already revoked token succeeds.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthError>;

    /// Resolve the identity behind `token`.
    async fn identity(&self, token: &AccessToken) -> Result<Identity, AuthError>;
}
