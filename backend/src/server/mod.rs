//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{BackendChoice, ServerConfig};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use rentify::Trace;
#[cfg(debug_assertions)]
use rentify::doc::ApiDoc;
use rentify::inbound::http::auth::{me, sign_in, sign_out, sign_up};
use rentify::inbound::http::dashboard::{get_dashboard, set_complaint_status, set_user_active};
use rentify::inbound::http::health::{HealthState, live, ready};
use rentify::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(sign_in)
        .service(sign_up)
        .service(sign_out)
        .service(me)
        .service(get_dashboard)
        .service(set_user_active)
        .service(set_complaint_status);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the backend adapters cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config.backend)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        backend: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! End-to-end wiring checks for the assembled application.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rentify::outbound::memory::DEMO_PASSWORD;
    use rstest::rstest;
    use serde_json::json;

    fn deps(seed_demo_data: bool) -> AppDependencies {
        let state = build_http_state(&BackendChoice::InMemory { seed_demo_data }).expect("state");
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(state),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_reflects_health_state() {
        let deps = deps(false);
        let health = deps.health_state.clone();
        let app = actix_test::init_service(build_app(deps)).await;

        let before = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let after = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(after.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn demo_admin_reaches_the_dashboard_with_private_cookies() {
        let app = actix_test::init_service(build_app(deps(true))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/sign-in")
                .set_json(json!({"email": "admin@rentify.test", "password": DEMO_PASSWORD}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(|c| c.into_owned())
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.max_age().is_some());

        let dashboard = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(dashboard.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(dashboard).await;
        assert_eq!(body["stats"]["totalUsers"], 8);
    }
}
