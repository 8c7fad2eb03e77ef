//! Server settings loaded via OrthoConfig.
//!
//! Values come from `MEAL_LEDGER_*` environment variables or the matching
//! command-line flags. Without a database URL the server runs against the
//! in-memory ledger.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5500;

/// Listener and store settings for the ledger server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEAL_LEDGER")]
pub struct AppSettings {
    /// Interface to bind.
    pub address: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connect_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Interface to bind, defaulting to every interface.
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(DEFAULT_ADDRESS)
    }

    /// Port to bind, defaulting to `5500`.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Pool settings when a database is configured.
    ///
    /// A blank URL counts as unset.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())?;
        let mut config = PoolConfig::new(url);
        if let Some(max) = self.max_connections {
            config = config.with_max_size(max);
        }
        if let Some(secs) = self.connect_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}
