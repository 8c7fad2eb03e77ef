//! Backend entry-point: loads settings, prepares the ledger store and serves
//! the REST API.

mod server;

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use meal_ledger::config::AppSettings;
use meal_ledger::inbound::http::auth_config::{BuildMode, SecretSource, auth_settings_from_env};
use meal_ledger::inbound::http::health::HealthState;
use meal_ledger::outbound::identity::JwtIdentityVerifier;
use meal_ledger::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|e| eyre!("failed to load settings: {e}"))?;
    let auth = auth_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid token settings")?;
    if auth.source() == SecretSource::Ephemeral {
        warn!("token secret is ephemeral; externally issued tokens will be rejected");
    }
    let verifier = Arc::new(JwtIdentityVerifier::new(auth.secret()));

    let bind_addr = resolve_bind_addr(&settings)?;
    let mut config = ServerConfig::new(bind_addr, verifier);
    if let Some(pool_config) = settings.pool_config() {
        config = config.with_db_pool(prepare_database(pool_config).await?);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::make_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "meal ledger listening");
    let outcome = server.await;
    health_state.mark_draining();
    outcome.wrap_err("server terminated")
}

fn resolve_bind_addr(settings: &AppSettings) -> Result<SocketAddr> {
    let (address, port) = (settings.address(), settings.port());
    (address, port)
        .to_socket_addrs()
        .wrap_err_with(|| format!("cannot resolve bind address {address}:{port}"))?
        .next()
        .ok_or_else(|| eyre!("no socket address for {address}:{port}"))
}

/// Apply pending migrations, then open the async pool.
async fn prepare_database(pool_config: PoolConfig) -> Result<DbPool> {
    let url = pool_config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .wrap_err("migration task panicked")??;
    info!(applied, "database migrations applied");
    DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")
}
