//! Reqwest-backed identity provider adapter for the hosted auth API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, info};

use super::dto::{
    AuthErrorDto, AuthUserDto, PasswordGrantDto, SessionDto, SignUpDto, SignUpResponseDto,
    UserMetadataDto,
};
use super::transport::{BaasEndpoint, SendFailure, is_timeout_status, status_message};
use crate::domain::ports::{AuthError, IdentityProvider};
use crate::domain::{
    AccessToken, AuthSession, Identity, Registration, SignInCredentials, SignUpOutcome,
};

/// Identity provider over `/auth/v1`.
pub struct HttpIdentityProvider {
    client: Client,
    endpoint: BaasEndpoint,
}

impl From<SendFailure> for AuthError {
    fn from(value: SendFailure) -> Self {
        match value {
            SendFailure::Timeout(message) => AuthError::timeout(message),
            SendFailure::Transport(message) => AuthError::transport(message),
        }
    }
}

/// Which call produced an error body; the same status means different things
/// on different endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthCall {
    SignIn,
    SignUp,
    Session,
}

fn map_auth_status(call: AuthCall, status: StatusCode, body: &[u8]) -> AuthError {
    if is_timeout_status(status) {
        return AuthError::timeout(status_message(status, body));
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return AuthError::transport(status_message(status, body));
    }

    let dto: AuthErrorDto = serde_json::from_slice(body).unwrap_or_default();
    let code = dto.error_code.as_deref().unwrap_or_default();
    let text = dto.text().unwrap_or_default().to_owned();
    let lowered = text.to_ascii_lowercase();

    match call {
        AuthCall::SignIn => AuthError::invalid_credentials(),
        AuthCall::Session => AuthError::session_expired(),
        AuthCall::SignUp if code == "user_already_exists" || lowered.contains("already registered") => {
            AuthError::duplicate_account("")
        }
        AuthCall::SignUp if code == "weak_password" || lowered.contains("password should") => {
            AuthError::weak_password(text)
        }
        AuthCall::SignUp if code == "email_address_invalid" || lowered.contains("email") => {
            AuthError::invalid_email(text)
        }
        AuthCall::SignUp if text.is_empty() => AuthError::validation(status_message(status, body)),
        AuthCall::SignUp => AuthError::validation(text),
    }
}

impl HttpIdentityProvider {
    pub fn new(client: Client, endpoint: BaasEndpoint) -> Self {
        Self { client, endpoint }
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        call: AuthCall,
    ) -> Result<Vec<u8>, AuthError> {
        let url = self
            .endpoint
            .url(path)
            .map_err(|err| AuthError::transport(format!("invalid auth url: {err}")))?;
        let request = self.client.post(url).query(query).json(body);
        let response = self
            .endpoint
            .authorise(request, None)
            .send()
            .await
            .map_err(SendFailure::from)?;
        let status = response.status();
        let body = response.bytes().await.map_err(SendFailure::from)?;
        if !status.is_success() {
            return Err(map_auth_status(call, status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, AuthError> {
    serde_json::from_slice(body)
        .map_err(|err| AuthError::transport(format!("unreadable auth response: {err}")))
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, AuthError> {
        let body = PasswordGrantDto {
            email: credentials.email(),
            password: credentials.password(),
        };
        let raw = self
            .post_json(
                "auth/v1/token",
                &[("grant_type", "password")],
                &body,
                AuthCall::SignIn,
            )
            .await?;
        let session: SessionDto = decode(&raw)?;
        session.into_session().map_err(AuthError::transport)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, AuthError> {
        let body = SignUpDto {
            email: registration.email(),
            password: registration.password(),
            data: UserMetadataDto {
                full_name: registration.full_name(),
                role: registration.role(),
            },
        };
        let raw = self
            .post_json("auth/v1/signup", &[], &body, AuthCall::SignUp)
            .await
            .map_err(|err| match err {
                AuthError::DuplicateAccount { .. } => {
                    AuthError::duplicate_account(registration.email())
                }
                other => other,
            })?;

        match decode::<SignUpResponseDto>(&raw)? {
            SignUpResponseDto::Session(session) => session
                .into_session()
                .map(SignUpOutcome::SignedIn)
                .map_err(AuthError::transport),
            SignUpResponseDto::User(user) => {
                let identity = user.into_identity().map_err(AuthError::transport)?;
                info!(user_id = %identity.id, "account created; awaiting email confirmation");
                Ok(SignUpOutcome::PendingConfirmation(identity))
            }
        }
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthError> {
        let url = self
            .endpoint
            .url("auth/v1/logout")
            .map_err(|err| AuthError::transport(format!("invalid auth url: {err}")))?;
        let request = self.client.post(url);
        let response = self
            .endpoint
            .authorise(request, Some(token.expose()))
            .send()
            .await
            .map_err(SendFailure::from)?;
        let status = response.status();
        match status {
            _ if status.is_success() => Ok(()),
            // Already revoked or never valid: nothing left to sign out.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(%status, "token already invalid at sign-out");
                Ok(())
            }
            _ => {
                let body = response.bytes().await.map_err(SendFailure::from)?;
                Err(map_auth_status(AuthCall::Session, status, body.as_ref()))
            }
        }
    }

    async fn identity(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        let url = self
            .endpoint
            .url("auth/v1/user")
            .map_err(|err| AuthError::transport(format!("invalid auth url: {err}")))?;
        let request = self.client.get(url);
        let response = self
            .endpoint
            .authorise(request, Some(token.expose()))
            .send()
            .await
            .map_err(SendFailure::from)?;
        let status = response.status();
        let body = response.bytes().await.map_err(SendFailure::from)?;
        if !status.is_success() {
            return Err(map_auth_status(AuthCall::Session, status, body.as_ref()));
        }
        let user: AuthUserDto = decode(body.as_ref())?;
        user.into_identity().map_err(AuthError::transport)
    }
}
