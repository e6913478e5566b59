//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use mockable::Clock;
use tracing::info;

#[cfg(debug_assertions)]
use field_reports::doc::ApiDoc;
use field_reports::domain::ports::PasswordHasher;
use field_reports::domain::{Email, TemporaryPassword};
use field_reports::inbound::http::api_routes;
use field_reports::inbound::http::auth::login;
use field_reports::inbound::http::health::{HealthState, health, live, ready};
use field_reports::inbound::http::state::HttpState;
use field_reports::inbound::http::validation::{json_config, query_config};
use field_reports::middleware::{LoginRateLimit, Trace, cors_policy};
use field_reports::outbound::persistence::{DbPool, seed_ceo};
use field_reports::outbound::security::Argon2PasswordHasher;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    login_limiter: LoginRateLimit,
    frontend_origin: Arc<str>,
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        login_limiter,
        frontend_origin,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(security_headers())
        .wrap(Trace)
        .wrap(cors_policy(&frontend_origin))
        .service(
            web::resource("/auth/login")
                .wrap(login_limiter)
                .route(web::post().to(login)),
        )
        .configure(api_routes)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Create the CEO account on first start.
///
/// The temporary password is hashed like any other and the account must
/// replace it at first login.
///
/// # Errors
/// Returns [`std::io::Error`] when the configured email or password is
/// unusable, or the database is unavailable.
pub async fn seed_initial_ceo(
    pool: &DbPool,
    email: &str,
    password: &str,
    clock: &dyn Clock,
) -> std::io::Result<()> {
    let email = Email::new(email)
        .map_err(|err| std::io::Error::other(format!("invalid CEO email: {err}")))?;
    let password = TemporaryPassword::new(password)
        .map_err(|err| std::io::Error::other(format!("invalid CEO password: {err}")))?;
    let hash = Argon2PasswordHasher::new()
        .hash(password.expose())
        .await
        .map_err(std::io::Error::other)?;
    let outcome = seed_ceo(pool, &email, &hash, clock.utc())
        .await
        .map_err(std::io::Error::other)?;
    info!(?outcome, email = %email, "CEO account seeding complete");
    Ok(())
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with the pool, secrets and limits.
/// - `clock`: time source shared by the services and the login limiter.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config, &clock);
    let login_limiter =
        LoginRateLimit::new(config.login_rate_limit, config.login_rate_window, clock)
            .trust_forwarded_for(config.trust_forwarded_for);
    let bind_addr = config.bind_addr;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        login_limiter,
        frontend_origin: Arc::from(config.frontend_origin.as_str()),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, frontend_origin = %config.frontend_origin, "listening");
    health_state.mark_ready();
    Ok(server)
}
