//! Authentication primitives: sign-in credentials, registration forms and the
//! authenticated identity.
//!
//! Inbound adapters hand raw strings to the constructors here; nothing reaches
//! the identity provider until the same checks the sign-in and sign-up forms
//! perform have passed.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::{EmailAddress, FullName, Role, UserId, UserValidationError};

/// Minimum accepted password length for new accounts.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when sign-in or sign-up input is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// At least one required field was blank.
    MissingFields,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password and confirmation differ.
    PasswordMismatch,
    /// Email is not in `local@domain.tld` shape.
    InvalidEmail,
    /// Full name exceeds the accepted length.
    FullNameTooLong { max: usize },
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Please fill in all fields"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "Passwords do not match"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::FullNameTooLong { max } => {
                write!(f, "Full name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl AuthValidationError {
    /// Name of the offending form field, when a single field is at fault.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingFields => None,
            Self::PasswordTooShort { .. } => Some("password"),
            Self::PasswordMismatch => Some("confirmPassword"),
            Self::InvalidEmail => Some("email"),
            Self::FullNameTooLong { .. } => Some("fullName"),
        }
    }
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is preserved.
///
/// # Examples
/// ```
/// use rentify::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts(" admin@rentify.test ", "secret").unwrap();
/// assert_eq!(creds.email(), "admin@rentify.test");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthValidationError::MissingFields);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw sign-up form values as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub role: Option<Role>,
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    full_name: FullName,
    email: EmailAddress,
    password: Zeroizing<String>,
    role: Role,
}

impl Registration {
    /// Validate a sign-up form.
    ///
    /// Checks run in the order the form reports them: missing fields, then
    /// password length, then confirmation, then email shape. A missing role
    /// means [`Role::Tenant`].
    pub fn try_from_form(form: RegistrationForm<'_>) -> Result<Self, AuthValidationError> {
        let blank = [form.full_name, form.email, form.password, form.confirm_password]
            .iter()
            .any(|value| value.trim().is_empty());
        if blank {
            return Err(AuthValidationError::MissingFields);
        }
        if form.password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if form.password != form.confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }
        let email = EmailAddress::new(form.email).map_err(|err| match err {
            UserValidationError::EmptyEmail => AuthValidationError::MissingFields,
            _ => AuthValidationError::InvalidEmail,
        })?;
        let full_name = FullName::new(form.full_name).map_err(|err| match err {
            UserValidationError::FullNameTooLong { max } => {
                AuthValidationError::FullNameTooLong { max }
            }
            _ => AuthValidationError::MissingFields,
        })?;

        Ok(Self {
            full_name,
            email,
            password: Zeroizing::new(form.password.to_owned()),
            role: form.role.unwrap_or_default(),
        })
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_ref()
    }

    pub fn email(&self) -> &str {
        self.email.as_ref()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "admin@rentify.test")]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Where the client should go after authenticating.
    #[must_use]
    pub fn landing_path(&self) -> &'static str {
        self.role.landing_path()
    }
}

/// Bearer token issued by the identity provider. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// The raw token, for use in an `Authorization` header or session cookie.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// A signed-in identity together with the token that proves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub identity: Identity,
    pub access_token: AccessToken,
}

/// Result of a successful sign-up.
///
/// Providers that require email confirmation create the account without
/// issuing a session; the caller signs in once the address is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is live and signed in.
    SignedIn(AuthSession),
    /// The account exists but cannot sign in until its email is confirmed.
    PendingConfirmation(Identity),
}

impl SignUpOutcome {
    /// Identity of the new account.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        match self {
            Self::SignedIn(session) => &session.identity,
            Self::PendingConfirmation(identity) => identity,
        }
    }

    /// The session, when the provider issued one.
    #[must_use]
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::PendingConfirmation(_) => None,
        }
    }
}
