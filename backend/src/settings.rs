//! Server configuration loaded via OrthoConfig.
//!
//! Values layer from defaults, an optional config file, `RENTIFY_*`
//! environment variables and command-line flags, in that order.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration values for the HTTP server and its backend adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RENTIFY")]
pub struct AppSettings {
    /// Interface the listener binds to.
    pub bind_host: Option<String>,
    /// Port the listener binds to.
    pub bind_port: Option<u16>,
    /// Base URL of the hosted backend. Unset selects the in-memory backend.
    pub backend_url: Option<String>,
    /// Project API key sent with every hosted-backend request.
    pub backend_api_key: Option<String>,
    /// Per-request timeout for hosted-backend calls.
    pub request_timeout_secs: Option<u64>,
    /// Populate the in-memory backend with demo accounts and records.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Fall back to a generated session key when the key file is unreadable.
    pub allow_ephemeral_session_key: Option<bool>,
}

impl AppSettings {
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    pub fn bind_port(&self) -> u16 {
        self.bind_port.unwrap_or(DEFAULT_BIND_PORT)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// The hosted backend's URL and key, when both are configured.
    pub fn backend(&self) -> Option<(&str, &str)> {
        match (&self.backend_url, &self.backend_api_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}
