//! Grievance server entry-point: loads settings, prepares storage, and
//! serves the complaint API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use grievance::inbound::http::health::HealthState;
use grievance::inbound::http::session_config::{BuildMode, session_settings_from_env};
use grievance::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, build_http_state, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let database_url = settings
        .database_url
        .clone()
        .ok_or_else(|| eyre!("GRIEVANCE_DATABASE_URL must be set"))?;

    if settings.run_migrations {
        run_pending_migrations(&database_url)
            .await
            .wrap_err("failed to apply migrations")?;
    } else {
        info!("skipping embedded migrations");
    }

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build connection pool")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let http_state = build_http_state(&pool, &settings)?;

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = settings.bind_addr(), "starting grievance server");
    let server = create_server(health_state, http_state, &session, settings.bind_addr())?;
    server.await?;
    Ok(())
}
