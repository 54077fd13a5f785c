//! The aggregate view model produced by one dashboard load.

use serde::Serialize;
use utoipa::ToSchema;

use super::notice::Notice;
use crate::domain::{Apartment, Complaint, UserAccount};

/// Headline counters. A counter whose query failed reads zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_landlords: u64,
    pub total_tenants: u64,
    pub total_apartments: u64,
    pub total_applications: u64,
    pub total_complaints: u64,
}

/// Everything the admin dashboard renders.
///
/// ## Invariants
/// - `recent_apartments` and `recent_complaints` hold at most
///   [`RECENT_LIMIT`](super::RECENT_LIMIT) rows, newest first.
/// - The parts are read independently; no cross-query consistency holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_apartments: Vec<Apartment>,
    pub recent_complaints: Vec<Complaint>,
    pub users: Vec<UserAccount>,
}

/// Result of a load: always a snapshot, plus at most one error notice when
/// any part of it fell back to a default.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub snapshot: DashboardSnapshot,
    pub notice: Option<Notice>,
}

/// Result of a successful mutation: its success notice and the re-fetched
/// dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub notice: Notice,
    pub refreshed: LoadOutcome,
}
