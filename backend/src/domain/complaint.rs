//! Complaint tickets and their status workflow.
//!
//! Tickets start `open` and an admin moves them to `investigating`,
//! `resolved` or `dismissed`. `resolved_at` tracks the status: it carries a
//! timestamp exactly while the ticket is resolved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::records::{RowError, lenient_contact, lenient_timestamp, null_as_default};
use super::user::{ContactSummary, UserId};

/// Identifier of a complaint ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ComplaintId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComplaintId> for String {
    fn from(value: ComplaintId) -> Self {
        value.0.to_string()
    }
}

/// Ticket status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    Dismissed,
}

/// Statuses an admin may move a ticket to.
pub const TRANSITION_TARGETS: [ComplaintStatus; 3] = [
    ComplaintStatus::Investigating,
    ComplaintStatus::Resolved,
    ComplaintStatus::Dismissed,
];

impl ComplaintStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Investigating => "investigating",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    /// Whether the dashboard renders transition buttons for this status.
    ///
    /// Only `resolved` hides them; a dismissed ticket can still be reopened
    /// for investigation or resolved.
    #[must_use]
    pub fn shows_transition_controls(self) -> bool {
        self != Self::Resolved
    }

    /// Targets offered by the dashboard for a ticket in this status.
    #[must_use]
    pub fn available_transitions(self) -> &'static [ComplaintStatus] {
        if self.shows_transition_controls() {
            &TRANSITION_TARGETS
        } else {
            &[]
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised for an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown complaint status `{0}`")]
pub struct UnknownComplaintStatus(pub String);

impl FromStr for ComplaintStatus {
    type Err = UnknownComplaintStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "investigating" => Ok(Self::Investigating),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(UnknownComplaintStatus(other.to_owned())),
        }
    }
}

/// Fields written when an admin changes a ticket's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    status: ComplaintStatus,
    resolved_at: Option<DateTime<Utc>>,
}

/// `open` cannot be chosen as a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("complaints cannot be moved back to `open`")]
pub struct ReopenNotAllowed;

impl StatusChange {
    /// Build the update for moving a ticket to `status` at `now`.
    pub fn to(status: ComplaintStatus, now: DateTime<Utc>) -> Result<Self, ReopenNotAllowed> {
        let resolved_at = match status {
            ComplaintStatus::Open => return Err(ReopenNotAllowed),
            ComplaintStatus::Resolved => Some(now),
            ComplaintStatus::Investigating | ComplaintStatus::Dismissed => None,
        };
        Ok(Self {
            status,
            resolved_at,
        })
    }

    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }
}

/// A ticket row with its complainant resolved through `complainant_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[schema(value_type = String)]
    pub id: ComplaintId,
    pub subject: String,
    pub description: String,
    pub status: ComplaintStatus,
    #[schema(value_type = Option<String>)]
    pub complainant_id: Option<UserId>,
    pub complainant: Option<ContactSummary>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Remote row shape for `complaints`.
#[derive(Debug, Deserialize)]
pub struct ComplaintRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    complainant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_contact")]
    complainant: Option<ContactSummary>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = RowError;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .ok_or_else(|| RowError::invalid("id", "missing"))?
            .parse::<ComplaintId>()
            .map_err(|err| RowError::invalid("id", err))?;
        let status = row
            .status
            .ok_or_else(|| RowError::invalid("status", "missing"))?
            .parse::<ComplaintStatus>()
            .map_err(|err| RowError::invalid("status", err))?;
        Ok(Self {
            id,
            subject: row.subject,
            description: row.description,
            status,
            complainant_id: row.complainant_id.and_then(|raw| UserId::new(raw).ok()),
            complainant: row.complainant,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn resolving_stamps_the_clock_time(now: DateTime<Utc>) {
        let change = StatusChange::to(ComplaintStatus::Resolved, now).expect("allowed");
        assert_eq!(change.resolved_at(), Some(now));
    }

    #[rstest]
    #[case(ComplaintStatus::Investigating)]
    #[case(ComplaintStatus::Dismissed)]
    fn other_targets_clear_the_resolution_time(now: DateTime<Utc>, #[case] status: ComplaintStatus) {
        let change = StatusChange::to(status, now).expect("allowed");
        assert_eq!(change.status(), status);
        assert!(change.resolved_at().is_none());
    }

    #[rstest]
    fn open_is_not_a_target(now: DateTime<Utc>) {
        assert_eq!(
            StatusChange::to(ComplaintStatus::Open, now),
            Err(ReopenNotAllowed)
        );
    }

    #[rstest]
    #[case(ComplaintStatus::Open, true)]
    #[case(ComplaintStatus::Investigating, true)]
    #[case(ComplaintStatus::Dismissed, true)]
    #[case(ComplaintStatus::Resolved, false)]
    fn only_resolved_hides_controls(#[case] status: ComplaintStatus, #[case] shown: bool) {
        assert_eq!(status.shows_transition_controls(), shown);
        assert_eq!(status.available_transitions().is_empty(), !shown);
    }

    #[rstest]
    fn rows_with_unknown_status_are_rejected() {
        let row: ComplaintRow = serde_json::from_value(json!({
            "id": "1b4e28ba-2fa1-41d2-883f-0016d3cca427",
            "status": "escalated",
        }))
        .expect("shape is valid");
        let err = Complaint::try_from(row).expect_err("unknown status");
        assert!(matches!(err, RowError::InvalidField { field: "status", .. }));
    }

    #[rstest]
    fn rows_decode_with_complainant_join() {
        let row: ComplaintRow = serde_json::from_value(json!({
            "id": "1b4e28ba-2fa1-41d2-883f-0016d3cca427",
            "subject": "Leaking faucet",
            "description": null,
            "status": "investigating",
            "complainant_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "complainant": { "full_name": "Tom Tenant", "email": "tom@rentify.test" },
            "created_at": "2024-05-30T09:15:00+00:00",
            "resolved_at": null,
        }))
        .expect("shape is valid");
        let complaint = Complaint::try_from(row).expect("decodes");
        assert_eq!(complaint.status, ComplaintStatus::Investigating);
        assert_eq!(complaint.description, "");
        assert!(complaint.resolved_at.is_none());
        assert_eq!(
            complaint.complainant.map(|c| c.email).as_deref(),
            Some("tom@rentify.test")
        );
    }
}
