//! Authentication endpoints.
//!
//! ```text
//! POST /api/v1/auth/sign-in  {"email":"admin@rentify.test","password":"..."}
//! POST /api/v1/auth/sign-up  {"fullName":"...","email":"...","password":"...","confirmPassword":"...","role":"landlord"}
//! POST /api/v1/auth/sign-out
//! GET  /api/v1/auth/me
//! ```
//!
//! Each request builds its own [`SessionService`](crate::domain::SessionService)
//! context; the cookie is the only state that outlives a request.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, Error, Identity, Notice, RegistrationForm, Role, SessionService, SignUpOutcome,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/auth/sign-in`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body for `POST /api/v1/auth/sign-up`. `role` defaults to `tenant`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

const SIGNED_IN: &str = "Login successful!";
const ACCOUNT_CREATED: &str = "Account created successfully!";
const CONFIRM_EMAIL: &str = "Account created successfully! Please confirm your email, then sign in.";
const SIGNED_OUT: &str = "Signed out successfully";

/// Signed-in identity and where the client should navigate next.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub identity: Identity,
    #[schema(example = "/admin/dashboard")]
    pub landing_path: String,
    /// False only after a sign-up that still awaits email confirmation.
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl From<&Identity> for AuthResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            identity: identity.clone(),
            landing_path: identity.landing_path().to_owned(),
            signed_in: true,
            notice: None,
        }
    }
}

impl AuthResponse {
    fn with_notice(mut self, message: &str) -> Self {
        self.notice = Some(Notice::success(message));
        self
    }
}

/// Response for `POST /api/v1/auth/sign-out`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignOutResponse {
    pub notice: Notice,
}

fn establish(
    session: &SessionContext,
    auth: &AuthSession,
    message: &str,
) -> ApiResult<web::Json<AuthResponse>> {
    session.persist(auth)?;
    Ok(web::Json(AuthResponse::from(&auth.identity).with_notice(message)))
}

/// Authenticate with email and password and start a cookie session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing fields", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let SignInRequest { email, password } = payload.into_inner();
    let auth = state.session_service().sign_in(&email, &password).await?;
    establish(&session, &auth, SIGNED_IN)
}

/// Create an account with the requested role and sign it in. When the
/// provider requires email confirmation no cookie is set and `signedIn` is
/// false.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie, when signed in"))),
        (status = 400, description = "Validation failed", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/sign-up")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let request = payload.into_inner();
    let form = RegistrationForm {
        full_name: &request.full_name,
        email: &request.email,
        password: &request.password,
        confirm_password: &request.confirm_password,
        role: request.role,
    };
    match state.session_service().sign_up(form).await? {
        SignUpOutcome::SignedIn(auth) => establish(&session, &auth, ACCOUNT_CREATED),
        SignUpOutcome::PendingConfirmation(identity) => {
            session.clear();
            let mut response = AuthResponse::from(&identity).with_notice(CONFIRM_EMAIL);
            response.signed_in = false;
            Ok(web::Json(response))
        }
    }
}

/// End the session. Succeeds whether or not one exists.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses((status = 200, description = "Signed out", body = SignOutResponse)),
    tags = ["auth"],
    operation_id = "signOut"
)]
#[post("/auth/sign-out")]
pub async fn sign_out(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SignOutResponse>> {
    if let Some(auth) = session.auth_session()? {
        SessionService::restore(state.identity.clone(), auth)
            .sign_out()
            .await;
    }
    session.clear();
    Ok(web::Json(SignOutResponse {
        notice: Notice::success(SIGNED_OUT),
    }))
}

/// The signed-in identity, re-checked against the identity provider.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current identity", body = AuthResponse),
        (status = 401, description = "Not signed in or session expired", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentIdentity"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AuthResponse>> {
    let Some(auth) = session.auth_session()? else {
        return Err(Error::unauthorized("Please sign in to continue"));
    };
    let context = SessionService::restore(state.identity.clone(), auth);
    match context.refresh().await {
        Ok(identity) => {
            if let Some(refreshed) = context.access_token().map(|access_token| AuthSession {
                identity: identity.clone(),
                access_token,
            }) {
                session.persist(&refreshed)?;
            }
            Ok(web::Json(AuthResponse::from(&identity)))
        }
        Err(error) => {
            session.clear();
            Err(Error::from(error))
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
