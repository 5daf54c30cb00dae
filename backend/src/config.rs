//! Server configuration.
//!
//! Every option can be given as a flag or through the environment (a `.env`
//! file is loaded by the binary before parsing).

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ServerError, ServerResult};
use crate::store::DatabaseSettings;

/// Options of `cadastros serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeConfig {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Require TLS for database connections
    #[arg(long, env = "DATABASE_SSL", default_value_t = false, action = clap::ArgAction::Set)]
    pub database_ssl: bool,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_POOL_MAX", default_value_t = 10)]
    pub pool_max: u32,

    /// Idle time in milliseconds before a pooled connection is closed
    #[arg(long, env = "DATABASE_POOL_IDLE", default_value_t = 10_000)]
    pub pool_idle_ms: u64,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Allowed CORS origin(s), comma separated, or `*`
    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Serve the built web client from this directory
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Keep records in memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_ssl: false,
            pool_max: 10,
            pool_idle_ms: 10_000,
            port: 3000,
            cors_origin: "*".to_string(),
            static_dir: None,
            in_memory: false,
        }
    }
}

impl ServeConfig {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Database settings, or a configuration error when no URL was given.
    pub fn database_settings(&self) -> ServerResult<DatabaseSettings> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ServerError::Config("DATABASE_URL is not set (use --in-memory to run without a database)".into()))?;

        Ok(DatabaseSettings {
            url: url.to_string(),
            ssl: self.database_ssl,
            max_connections: self.pool_max,
            idle_timeout: Duration::from_millis(self.pool_idle_ms),
        })
    }

    /// `None` means any origin.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }
}
