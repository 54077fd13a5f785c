//! OpenAPI document for the REST API.
//!
//! Registers every inbound endpoint, the response schemas they reference,
//! and the session cookie security scheme. Served through Swagger UI in
//! debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Apartment, Complaint, ComplaintStatus, ContactSummary, DashboardStats, Error, ErrorCode,
    Identity, Notice, NoticeLevel, Role, UserAccount,
};
use crate::inbound::http::auth::{AuthResponse, SignInRequest, SignOutResponse, SignUpRequest};
use crate::inbound::http::dashboard::{
    ComplaintView, DashboardResponse, SetActiveRequest, SetStatusRequest, UserAccountView,
};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/auth/sign-in.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Rentify admin API",
        description = "Session authentication and the admin dashboard over the hosted backend."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::me,
        crate::inbound::http::dashboard::get_dashboard,
        crate::inbound::http::dashboard::set_user_active,
        crate::inbound::http::dashboard::set_complaint_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Identity,
        Role,
        AuthResponse,
        SignInRequest,
        SignUpRequest,
        SignOutResponse,
        DashboardResponse,
        DashboardStats,
        Apartment,
        Complaint,
        ComplaintStatus,
        ComplaintView,
        ContactSummary,
        UserAccount,
        UserAccountView,
        Notice,
        NoticeLevel,
        SetActiveRequest,
        SetStatusRequest,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-up and session"),
        (name = "admin", description = "Admin dashboard"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
