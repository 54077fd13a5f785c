//! One-line user notifications rendered as toasts by the client.

use serde::Serialize;
use utoipa::ToSchema;

/// Shown once when any part of a dashboard load fell back to a default.
pub const LOAD_FAILED: &str = "Failed to load dashboard data";
/// Activation toggle failed.
pub const USER_STATUS_FAILED: &str = "Failed to update user status";
/// Complaint moved to a new status.
pub const COMPLAINT_UPDATED: &str = "Complaint status updated";
/// Complaint status change failed.
pub const COMPLAINT_UPDATE_FAILED: &str = "Failed to update complaint";
/// A non-admin reached an admin-only operation.
pub const ADMIN_ONLY: &str = "Access denied. Admin only.";

/// How the client styles a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A single toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Success notice for an activation toggle.
    pub fn user_activation(active: bool) -> Self {
        if active {
            Self::success("User activated successfully")
        } else {
            Self::success("User deactivated successfully")
        }
    }
}
