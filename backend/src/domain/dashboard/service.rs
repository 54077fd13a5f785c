//! Admin dashboard aggregation and mutations.
//!
//! A load fans out nine independent reads and waits for all of them. A read
//! that fails is logged and replaced by its default so the rest of the
//! dashboard still renders; the caller gets one error notice however many
//! reads failed. Mutations write a single row and then reload everything.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use super::notice::{
    ADMIN_ONLY, COMPLAINT_UPDATE_FAILED, COMPLAINT_UPDATED, LOAD_FAILED, Notice,
    USER_STATUS_FAILED,
};
use super::snapshot::{DashboardSnapshot, DashboardStats, LoadOutcome, MutationOutcome};
use crate::domain::ports::{
    FieldUpdates, Filter, Join, ListQuery, OrderBy, QueryError, RemoteDataService, Table,
    UpdateError,
};
use crate::domain::records::decode_rows;
use crate::domain::{
    Apartment, ApartmentRow, Complaint, ComplaintId, ComplaintRow, ComplaintStatus, Error,
    Identity, Role, StatusChange, UserAccount, UserAccountRow, UserId,
};

/// Rows shown in each of the "recent" lists.
pub const RECENT_LIMIT: usize = 10;

const CONTACT_COLUMNS: &[&str] = &["full_name", "email"];

fn landlord_join() -> Join {
    Join {
        alias: "landlord",
        foreign_key: "landlord_id",
        table: Table::Users,
        columns: CONTACT_COLUMNS,
    }
}

fn complainant_join() -> Join {
    Join {
        alias: "complainant",
        foreign_key: "complainant_id",
        table: Table::Users,
        columns: CONTACT_COLUMNS,
    }
}

/// Counts failed reads while substituting defaults.
#[derive(Debug, Default)]
struct LoadFailures(usize);

impl LoadFailures {
    fn settle<T: Default>(&mut self, part: &'static str, result: Result<T, QueryError>) -> T {
        result.unwrap_or_else(|error| {
            warn!(part, %error, transient = error.is_transient(), "dashboard read failed");
            self.0 += 1;
            T::default()
        })
    }
}

/// Client-facing error for a failed write. The remote message stays in the
/// logs; clients only get a stable reason.
fn update_failure(error: &UpdateError, notice: &'static str) -> Error {
    match error {
        UpdateError::NotFound { .. } => {
            Error::not_found(notice).with_details(json!({ "reason": "not_found" }))
        }
        UpdateError::PermissionDenied { .. } => {
            Error::forbidden(notice).with_details(json!({ "reason": "permission_denied" }))
        }
        UpdateError::Rejected { .. } => {
            Error::invalid_request(notice).with_details(json!({ "reason": "rejected" }))
        }
        UpdateError::Transport { .. } | UpdateError::Timeout { .. } => {
            Error::service_unavailable(notice)
        }
    }
}

/// Dashboard use-cases over a [`RemoteDataService`].
pub struct DashboardService<R: ?Sized> {
    data: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DashboardService<R>
where
    R: RemoteDataService + ?Sized,
{
    pub fn new(data: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { data, clock }
    }

    fn authorize(caller: &Identity) -> Result<(), Error> {
        if caller.is_admin() {
            Ok(())
        } else {
            warn!(user_id = %caller.id, role = %caller.role, "non-admin dashboard access");
            Err(Error::forbidden(ADMIN_ONLY))
        }
    }

    /// Load the full dashboard for an admin caller.
    pub async fn load_snapshot(&self, caller: &Identity) -> Result<LoadOutcome, Error> {
        Self::authorize(caller)?;
        Ok(self.fetch().await)
    }

    async fn fetch(&self) -> LoadOutcome {
        let data = &self.data;
        let (
            total_users,
            total_landlords,
            total_tenants,
            total_apartments,
            total_applications,
            total_complaints,
            apartments,
            complaints,
            users,
        ) = tokio::join!(
            data.count(Table::Users, None),
            data.count(Table::Users, Some(Filter::eq("role", Role::Landlord.as_str()))),
            data.count(Table::Users, Some(Filter::eq("role", Role::Tenant.as_str()))),
            data.count(Table::Apartments, None),
            data.count(Table::Applications, None),
            data.count(Table::Complaints, None),
            data.list(
                ListQuery::new(Table::Apartments)
                    .join(landlord_join())
                    .order_by(OrderBy::descending("created_at"))
                    .limit(RECENT_LIMIT)
            ),
            data.list(
                ListQuery::new(Table::Complaints)
                    .join(complainant_join())
                    .order_by(OrderBy::descending("created_at"))
                    .limit(RECENT_LIMIT)
            ),
            data.list(ListQuery::new(Table::Users).order_by(OrderBy::descending("created_at"))),
        );

        let mut failures = LoadFailures::default();
        let stats = DashboardStats {
            total_users: failures.settle("total_users", total_users),
            total_landlords: failures.settle("total_landlords", total_landlords),
            total_tenants: failures.settle("total_tenants", total_tenants),
            total_apartments: failures.settle("total_apartments", total_apartments),
            total_applications: failures.settle("total_applications", total_applications),
            total_complaints: failures.settle("total_complaints", total_complaints),
        };
        let recent_apartments: Vec<Apartment> = decode_rows::<ApartmentRow, _>(
            Table::Apartments,
            failures.settle("recent_apartments", apartments),
        );
        let recent_complaints: Vec<Complaint> = decode_rows::<ComplaintRow, _>(
            Table::Complaints,
            failures.settle("recent_complaints", complaints),
        );
        let users: Vec<UserAccount> =
            decode_rows::<UserAccountRow, _>(Table::Users, failures.settle("users", users));

        let notice = if failures.0 > 0 {
            error!(failed = failures.0, "dashboard loaded with defaults");
            Some(Notice::error(LOAD_FAILED))
        } else {
            None
        };

        LoadOutcome {
            snapshot: DashboardSnapshot {
                stats,
                recent_apartments,
                recent_complaints,
                users,
            },
            notice,
        }
    }

    /// Activate or deactivate a user account, then reload.
    ///
    /// The target's role is not re-checked; hiding the control for admin
    /// rows is left to the presentation.
    pub async fn set_user_active(
        &self,
        caller: &Identity,
        user_id: UserId,
        active: bool,
    ) -> Result<MutationOutcome, Error> {
        Self::authorize(caller)?;
        let fields = FieldUpdates::new().set("is_active", active);
        self.data
            .update(Table::Users, &user_id.to_string(), fields)
            .await
            .map_err(|err| {
                error!(%user_id, active, error = %err, "user status update failed");
                update_failure(&err, USER_STATUS_FAILED)
            })?;
        info!(%user_id, active, by = %caller.id, "user status updated");

        Ok(MutationOutcome {
            notice: Notice::user_activation(active),
            refreshed: self.fetch().await,
        })
    }

    /// Move a complaint to `status`, stamping or clearing `resolved_at`,
    /// then reload.
    pub async fn set_complaint_status(
        &self,
        caller: &Identity,
        complaint_id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<MutationOutcome, Error> {
        Self::authorize(caller)?;
        let change = StatusChange::to(status, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let fields = FieldUpdates::new()
            .set("status", change.status().as_str())
            .set(
                "resolved_at",
                change.resolved_at().map(|at| at.to_rfc3339()),
            );
        self.data
            .update(Table::Complaints, &complaint_id.to_string(), fields)
            .await
            .map_err(|err| {
                error!(%complaint_id, %status, error = %err, "complaint update failed");
                update_failure(&err, COMPLAINT_UPDATE_FAILED)
            })?;
        info!(%complaint_id, %status, by = %caller.id, "complaint status updated");

        Ok(MutationOutcome {
            notice: Notice::success(COMPLAINT_UPDATED),
            refreshed: self.fetch().await,
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
