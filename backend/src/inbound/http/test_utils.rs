//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::RemoteDataService;
use crate::domain::{DashboardService, Role};
use crate::Trace;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, dashboard};
use crate::outbound::memory::InMemoryBackend;
use crate::test_support::fixture_clock;

/// Session middleware with a fresh key and the `Secure` flag off, so plain
/// HTTP test requests round-trip the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// HTTP state over a fresh in-memory backend with a fixed clock.
pub fn memory_state() -> (Arc<InMemoryBackend>, HttpState) {
    let backend = Arc::new(InMemoryBackend::new(fixture_clock()));
    let data: Arc<dyn RemoteDataService> = backend.clone();
    let dashboard = Arc::new(DashboardService::new(data, fixture_clock()));
    (backend.clone(), HttpState::new(backend, dashboard))
}

/// Register an account directly in `backend` and return sign-in JSON for it.
pub fn registered(backend: &InMemoryBackend, email: &str, role: Role) -> serde_json::Value {
    backend
        .register("Fixture User", email, FIXTURE_PASSWORD, role)
        .expect("fixture account");
    serde_json::json!({ "email": email, "password": FIXTURE_PASSWORD })
}

pub const FIXTURE_PASSWORD: &str = "secret-pass";

/// The `/api/v1` surface over `state`, wrapped like the real server.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(auth::sign_in)
                .service(auth::sign_up)
                .service(auth::sign_out)
                .service(auth::me)
                .service(dashboard::get_dashboard)
                .service(dashboard::set_user_active)
                .service(dashboard::set_complaint_status),
        )
}
