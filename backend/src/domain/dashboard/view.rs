//! Presentation-facing dashboard state.
//!
//! Holds what a client would render: a loading flag, the last installed
//! snapshot and notices waiting to be shown. Starting a load drops the old
//! snapshot so nothing stale is displayed while the new one is fetched.
//! Loads are never cancelled; whichever finishes last is installed.

use super::notice::Notice;
use super::snapshot::{DashboardSnapshot, LoadOutcome, MutationOutcome};
use crate::domain::Error;

/// Client-side dashboard state machine: idle, loading, or showing a snapshot.
#[derive(Debug, Default)]
pub struct DashboardView {
    loading: bool,
    snapshot: Option<DashboardSnapshot>,
    notices: Vec<Notice>,
}

impl DashboardView {
    /// An idle view with nothing to show.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The installed snapshot; `None` while a load is in flight.
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Enter the loading state and drop the stale snapshot.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.snapshot = None;
    }

    /// Install a finished load and queue its notice, if any.
    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        self.loading = false;
        self.snapshot = Some(outcome.snapshot);
        self.notices.extend(outcome.notice);
    }

    /// Apply the result of a mutation. Failures keep the current snapshot.
    pub fn apply_mutation(&mut self, result: Result<MutationOutcome, Error>) {
        match result {
            Ok(outcome) => {
                self.notices.push(outcome.notice);
                self.finish_load(outcome.refreshed);
            }
            Err(error) => self.notices.push(Notice::error(error.message())),
        }
    }

    /// Hand pending notices to the renderer.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
