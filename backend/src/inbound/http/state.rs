//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see domain ports and
//! services, so they stay testable against mocks or the in-memory backend.

use std::sync::Arc;

use crate::domain::ports::{IdentityProvider, RemoteDataService};
use crate::domain::{DashboardService, SessionService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityProvider>,
    pub dashboard: Arc<DashboardService<dyn RemoteDataService>>,
}

impl HttpState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        dashboard: Arc<DashboardService<dyn RemoteDataService>>,
    ) -> Self {
        Self {
            identity,
            dashboard,
        }
    }

    /// A fresh, empty session context for one request.
    pub fn session_service(&self) -> SessionService {
        SessionService::new(self.identity.clone())
    }
}
