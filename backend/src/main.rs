//! Backend entry-point: loads configuration, then serves the auth and admin
//! dashboard API over the configured backend.

mod server;

use std::net::{IpAddr, SocketAddr};

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rentify::inbound::http::health::HealthState;
use rentify::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use rentify::outbound::baas::BaasEndpoint;
use rentify::settings::AppSettings;
use server::{BackendChoice, ServerConfig, create_server};

fn backend_choice(settings: &AppSettings) -> Result<BackendChoice> {
    match settings.backend() {
        Some((url, api_key)) => {
            let base = Url::parse(url).wrap_err_with(|| format!("invalid backend_url '{url}'"))?;
            Ok(BackendChoice::Hosted {
                endpoint: BaasEndpoint::new(base, api_key),
                timeout: settings.request_timeout(),
            })
        }
        None if settings.backend_url.is_some() => {
            Err(eyre!("backend_url is set but backend_api_key is missing"))
        }
        None => Ok(BackendChoice::InMemory {
            seed_demo_data: settings.seed_demo_data,
        }),
    }
}

fn bind_addr(settings: &AppSettings) -> Result<SocketAddr> {
    let host: IpAddr = settings
        .bind_host()
        .parse()
        .wrap_err_with(|| format!("invalid bind_host '{}'", settings.bind_host()))?;
    Ok(SocketAddr::new(host, settings.bind_port()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load configuration")?;
    let session = session_settings(
        &SessionToggles::from(&settings),
        BuildMode::from_debug_assertions(),
    )
    .wrap_err("session configuration")?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr(&settings)?,
    )
    .with_backend(backend_choice(&settings)?);
    info!(addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("create server")?;
    server.await.wrap_err("server stopped")
}
