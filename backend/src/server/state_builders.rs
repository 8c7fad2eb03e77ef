//! Builders wiring the ledger services onto the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use meal_ledger::inbound::http::state::{HttpState, HttpStatePorts};
use meal_ledger::outbound::memory::InMemoryLedger;
use meal_ledger::outbound::persistence::{
    DbPool, DieselMealRepository, DieselPaymentRepository, DieselUserDirectory,
};

use super::ServerConfig;

/// Ports backed by PostgreSQL.
fn postgres_ports(pool: &DbPool, clock: Arc<dyn Clock>, config: &ServerConfig) -> HttpStatePorts {
    HttpStatePorts::over_stores(
        Arc::new(DieselMealRepository::new(pool.clone())),
        Arc::new(DieselPaymentRepository::new(pool.clone())),
        Arc::new(DieselUserDirectory::new(pool.clone())),
        clock,
        config.verifier.clone(),
    )
}

/// Ports backed by one in-process ledger shared by every repository.
fn memory_ports(clock: Arc<dyn Clock>, config: &ServerConfig) -> HttpStatePorts {
    let ledger = Arc::new(InMemoryLedger::new());
    HttpStatePorts::over_stores(
        ledger.clone(),
        ledger.clone(),
        ledger,
        clock,
        config.verifier.clone(),
    )
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over the in-memory ledger.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "ledger store selected");
            postgres_ports(pool, clock, config)
        }
        None => {
            info!(store = "memory", "ledger store selected");
            memory_ports(clock, config)
        }
    };
    web::Data::new(HttpState::new(ports))
}
