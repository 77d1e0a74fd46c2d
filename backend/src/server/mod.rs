//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::AppSettings;
pub use state_builders::{StateBuildError, build_http_state};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use grievance::Trace;
#[cfg(debug_assertions)]
use grievance::doc::ApiDoc;
use grievance::inbound::http::configure;
use grievance::inbound::http::health::{HealthState, live, ready};
use grievance::inbound::http::session_config::SessionSettings;
use grievance::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything a worker needs to build its `App`.
#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
    session: SessionMiddleware<CookieSessionStore>,
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
    } = deps;

    let api = web::scope("").wrap(session).configure(configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.service(api)
}

/// Construct the HTTP server and mark it ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    session: &SessionSettings,
    bind_addr: &str,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
    };
    let key = session.key.clone();
    let cookie_secure = session.cookie_secure;

    let server = HttpServer::new(move || {
        let session = SessionSettings {
            key: key.clone(),
            cookie_secure,
        }
        .middleware();
        build_app(deps.clone(), session)
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
