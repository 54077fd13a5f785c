//! Domain primitives, services and ports.
//!
//! Purpose: define the typed records the dashboard works with, the session
//! and dashboard use-cases, and the ports they drive. Nothing here knows
//! about HTTP or the hosted backend's wire format.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - SessionService: observable session context over an identity provider.
//! - DashboardService: admin dashboard aggregation and mutations.

pub mod apartment;
pub mod auth;
pub mod complaint;
pub mod dashboard;
pub mod error;
pub mod ports;
pub mod records;
pub mod session_service;
pub mod trace_id;
pub mod user;

pub use self::apartment::{Apartment, ApartmentRow, ApartmentType};
pub use self::auth::{
    AccessToken, AuthSession, AuthValidationError, Identity, PASSWORD_MIN, Registration,
    RegistrationForm, SignInCredentials, SignUpOutcome,
};
pub use self::complaint::{
    Complaint, ComplaintId, ComplaintRow, ComplaintStatus, ReopenNotAllowed, StatusChange,
    TRANSITION_TARGETS, UnknownComplaintStatus,
};
pub use self::dashboard::{
    DashboardService, DashboardSnapshot, DashboardStats, DashboardView, LoadOutcome,
    MutationOutcome, Notice, NoticeLevel, RECENT_LIMIT,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::session_service::SessionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ContactSummary, EmailAddress, FullName, Role, UserAccount, UserAccountRow, UserId,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use rentify::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
