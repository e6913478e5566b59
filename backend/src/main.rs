//! Backend entry-point: loads configuration, prepares the database and serves
//! the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use field_reports::inbound::http::health::HealthState;
use field_reports::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use field_reports::settings::AppSettings;
use server::{ServerConfig, create_server, seed_initial_ceo};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let required = settings.validate().map_err(std::io::Error::other)?;

    if settings.run_migrations() {
        run_pending_migrations(&required.database_url)
            .await
            .map_err(std::io::Error::other)?;
    }

    let pool = DbPool::new(
        PoolConfig::new(required.database_url.clone())
            .with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(std::io::Error::other)?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if settings.seed_ceo() {
        seed_initial_ceo(
            &pool,
            settings.ceo_email(),
            settings.ceo_initial_password().as_str(),
            clock.as_ref(),
        )
        .await?;
    } else {
        info!("CEO seeding disabled");
    }

    let config = ServerConfig::new(required.bind_addr, pool, required.jwt_secret)
        .with_token_lifetimes(settings.access_token_ttl(), settings.refresh_token_ttl())
        .with_cookie_secure(settings.cookie_secure())
        .with_login_rate_limit(settings.login_rate_limit(), settings.login_rate_window())
        .with_trusted_forwarding(settings.trust_forwarded_for())
        .with_frontend_origin(required.frontend_origin);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, clock)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
