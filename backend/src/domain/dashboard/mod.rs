//! Admin dashboard: aggregation service, snapshot model and view state.

mod notice;
mod service;
mod snapshot;
mod view;

pub use notice::{Notice, NoticeLevel};
pub use service::{DashboardService, RECENT_LIMIT};
pub use snapshot::{DashboardSnapshot, DashboardStats, LoadOutcome, MutationOutcome};
pub use view::DashboardView;
