//! Builders wiring the identity and table ports into HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use rentify::domain::DashboardService;
use rentify::domain::ports::{IdentityProvider, RemoteDataService};
use rentify::inbound::http::state::HttpState;
use rentify::outbound::baas::{HttpDataService, HttpIdentityProvider, build_client};
use rentify::outbound::memory::{DEMO_PASSWORD, InMemoryBackend, seed_demo_data};

use super::BackendChoice;

/// Port implementations selected by [`BackendChoice`].
struct Ports {
    identity: Arc<dyn IdentityProvider>,
    data: Arc<dyn RemoteDataService>,
}

fn hosted_ports(choice: &BackendChoice) -> std::io::Result<Option<Ports>> {
    let BackendChoice::Hosted { endpoint, timeout } = choice else {
        return Ok(None);
    };
    let client = build_client(*timeout)
        .map_err(|err| std::io::Error::other(format!("build backend client: {err}")))?;
    info!(timeout_secs = timeout.as_secs(), "using hosted backend");
    Ok(Some(Ports {
        identity: Arc::new(HttpIdentityProvider::new(client.clone(), endpoint.clone())),
        data: Arc::new(HttpDataService::new(client, endpoint.clone())),
    }))
}

fn memory_ports(seed: bool, clock: Arc<dyn Clock>) -> std::io::Result<Ports> {
    let backend = Arc::new(InMemoryBackend::new(clock));
    if seed {
        let accounts = seed_demo_data(&backend)
            .map_err(|err| std::io::Error::other(format!("seed demo data: {err}")))?;
        info!(
            admin = %accounts.admin.email,
            landlords = accounts.landlords.len(),
            tenants = accounts.tenants.len(),
            password = DEMO_PASSWORD,
            "seeded in-memory backend with demo data"
        );
    } else {
        info!("using empty in-memory backend");
    }
    Ok(Ports {
        identity: backend.clone(),
        data: backend,
    })
}

/// Build the HTTP state for `choice`.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the HTTP client cannot be built or the
/// demo data cannot be seeded.
pub(super) fn build_http_state(choice: &BackendChoice) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match hosted_ports(choice)? {
        Some(ports) => ports,
        None => {
            let seed = matches!(
                choice,
                BackendChoice::InMemory {
                    seed_demo_data: true
                }
            );
            memory_ports(seed, clock.clone())?
        }
    };
    let dashboard = Arc::new(DashboardService::new(ports.data, clock));
    Ok(HttpState::new(ports.identity, dashboard))
}
