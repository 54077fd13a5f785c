//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use rentify::outbound::baas::BaasEndpoint;

/// Which implementation backs the identity and table ports.
#[derive(Debug, Clone)]
pub enum BackendChoice {
    /// The hosted backend-as-a-service.
    Hosted {
        endpoint: BaasEndpoint,
        timeout: Duration,
    },
    /// The in-process backend, optionally seeded with demo data.
    InMemory { seed_demo_data: bool },
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) backend: BackendChoice,
}

impl ServerConfig {
    /// Construct a server configuration over the unseeded in-memory backend.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            backend: BackendChoice::InMemory {
                seed_demo_data: false,
            },
        }
    }

    /// Select the backend the ports are wired to.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
