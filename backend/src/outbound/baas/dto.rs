//! DTOs for the hosted auth API.
//!
//! The adapter decodes responses into these first, then maps them onto
//! domain sessions and identities in one pass.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{AccessToken, AuthSession, Identity, Role, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: UserMetadataDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct UserMetadataDto<'a> {
    pub(super) full_name: &'a str,
    pub(super) role: Role,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: StoredMetadataDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StoredMetadataDto {
    #[serde(default)]
    pub(super) full_name: Option<String>,
    #[serde(default)]
    pub(super) role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) access_token: String,
    pub(super) user: AuthUserDto,
}

/// Sign-up answers with a session when accounts are confirmed automatically
/// and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session(SessionDto),
    User(AuthUserDto),
}

/// Error bodies come in several shapes depending on the endpoint.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AuthErrorDto {
    #[serde(default)]
    pub(super) error_code: Option<String>,
    #[serde(default)]
    pub(super) msg: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) error_description: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
}

impl AuthErrorDto {
    pub(super) fn text(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }
}

impl AuthUserDto {
    /// Map onto a domain identity. The role lives in user metadata; a missing
    /// or unknown role falls back to the least privileged one.
    pub(super) fn into_identity(self) -> Result<Identity, String> {
        let id = UserId::new(&self.id).map_err(|err| format!("user id `{}`: {err}", self.id))?;
        let role = match self.user_metadata.role.as_deref().map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            Some(Err(err)) => {
                warn!(user_id = %id, %err, "unrecognised role in user metadata");
                Role::default()
            }
            None => {
                warn!(user_id = %id, "user metadata carries no role");
                Role::default()
            }
        };
        Ok(Identity {
            id,
            email: self.email.unwrap_or_default(),
            full_name: self.user_metadata.full_name.unwrap_or_default(),
            role,
        })
    }
}

impl SessionDto {
    pub(super) fn into_session(self) -> Result<AuthSession, String> {
        Ok(AuthSession {
            identity: self.user.into_identity()?,
            access_token: AccessToken::new(self.access_token),
        })
    }
}
