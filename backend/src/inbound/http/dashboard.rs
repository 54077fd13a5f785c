//! Admin dashboard endpoints.
//!
//! ```text
//! GET /api/v1/admin/dashboard
//! PUT /api/v1/admin/users/{id}/active        {"active":false}
//! PUT /api/v1/admin/complaints/{id}/status   {"status":"resolved"}
//! ```
//!
//! Responses carry the snapshot plus the presentation hints a client needs
//! to render it: whether a complaint still shows transition controls and
//! whether a user row may be toggled.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Apartment, Complaint, ComplaintId, ComplaintStatus, DashboardSnapshot, DashboardStats, Error,
    LoadOutcome, MutationOutcome, Notice, UserAccount, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Complaint row with the transitions an admin may apply to it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub shows_transition_controls: bool,
    pub available_transitions: Vec<ComplaintStatus>,
}

impl From<Complaint> for ComplaintView {
    fn from(complaint: Complaint) -> Self {
        let status = complaint.status;
        Self {
            complaint,
            shows_transition_controls: status.shows_transition_controls(),
            available_transitions: status.available_transitions().to_vec(),
        }
    }
}

/// User row with the activation toggle hint. Admin rows cannot be toggled.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountView {
    #[serde(flatten)]
    pub account: UserAccount,
    pub can_toggle_active: bool,
}

impl From<UserAccount> for UserAccountView {
    fn from(account: UserAccount) -> Self {
        Self {
            can_toggle_active: account.can_toggle_active(),
            account,
        }
    }
}

/// Dashboard payload returned by every endpoint in this module.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_apartments: Vec<Apartment>,
    pub recent_complaints: Vec<ComplaintView>,
    pub users: Vec<UserAccountView>,
    /// At most one notice: a load failure or the result of a mutation.
    pub notice: Option<Notice>,
}

impl DashboardResponse {
    fn new(snapshot: DashboardSnapshot, notice: Option<Notice>) -> Self {
        let DashboardSnapshot {
            stats,
            recent_apartments,
            recent_complaints,
            users,
        } = snapshot;
        Self {
            stats,
            recent_apartments,
            recent_complaints: recent_complaints.into_iter().map(Into::into).collect(),
            users: users.into_iter().map(Into::into).collect(),
            notice,
        }
    }
}

impl From<LoadOutcome> for DashboardResponse {
    fn from(outcome: LoadOutcome) -> Self {
        Self::new(outcome.snapshot, outcome.notice)
    }
}

impl From<MutationOutcome> for DashboardResponse {
    fn from(outcome: MutationOutcome) -> Self {
        // A failed re-fetch notice outranks the success message.
        let notice = outcome.refreshed.notice.or(Some(outcome.notice));
        Self::new(outcome.refreshed.snapshot, notice)
    }
}

/// Body for `PUT /api/v1/admin/users/{id}/active`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Body for `PUT /api/v1/admin/complaints/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    #[schema(example = "investigating")]
    pub status: String,
}

fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    UserId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "id" }))
    })
}

fn parse_complaint_id(raw: &str) -> ApiResult<ComplaintId> {
    raw.parse::<ComplaintId>().map_err(|_| {
        Error::invalid_request("complaint id must be a valid UUID")
            .with_details(json!({ "field": "id" }))
    })
}

fn parse_status(raw: &str) -> ApiResult<ComplaintStatus> {
    raw.parse::<ComplaintStatus>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "status" }))
    })
}

/// Aggregate statistics, recent listings and complaints, and all users.
///
/// Individual query failures still return 200 with defaulted sections and a
/// single error notice.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getDashboard"
)]
#[get("/admin/dashboard")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardResponse>> {
    let caller = session.require_identity()?;
    let outcome = state.dashboard.load_snapshot(&caller).await?;
    Ok(web::Json(outcome.into()))
}

/// Activate or deactivate a user, then return the refreshed dashboard.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/active",
    params(("id" = String, Path, description = "User id")),
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Updated; refreshed snapshot", body = DashboardResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 503, description = "Backend unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "setUserActive"
)]
#[put("/admin/users/{id}/active")]
pub async fn set_user_active(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SetActiveRequest>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let caller = session.require_identity()?;
    let user_id = parse_user_id(&path.into_inner())?;
    let outcome = state
        .dashboard
        .set_user_active(&caller, user_id, payload.active)
        .await?;
    Ok(web::Json(outcome.into()))
}

/// Move a complaint to `investigating`, `resolved` or `dismissed`, then
/// return the refreshed dashboard.
#[utoipa::path(
    put,
    path = "/api/v1/admin/complaints/{id}/status",
    params(("id" = String, Path, description = "Complaint id")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Updated; refreshed snapshot", body = DashboardResponse),
        (status = 400, description = "Malformed id or status", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "No such complaint", body = Error),
        (status = 503, description = "Backend unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "setComplaintStatus"
)]
#[put("/admin/complaints/{id}/status")]
pub async fn set_complaint_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SetStatusRequest>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let caller = session.require_identity()?;
    let complaint_id = parse_complaint_id(&path.into_inner())?;
    let status = parse_status(&payload.status)?;
    let outcome = state
        .dashboard
        .set_complaint_status(&caller, complaint_id, status)
        .await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
