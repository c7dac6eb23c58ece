//! Database connection pool management

use std::fmt;
use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

use pv_shared::config::database::DatabaseConfig;

use crate::InfrastructureError;

/// MySQL connection pool wrapper
///
/// Cloning shares the underlying pool.
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
    config: DatabaseConfig,
}

/// Snapshot of pool usage
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    /// Currently open connections
    pub connections: u32,
    /// Open connections sitting idle
    pub idle_connections: u32,
    /// Configured pool ceiling
    pub max_connections: u32,
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}

impl DatabasePool {
    /// Create a new pool from configuration
    ///
    /// # Arguments
    /// * `config` - Database configuration with URL and pool limits
    ///
    /// # Returns
    /// * `Ok(DatabasePool)` - Pool ready for use
    /// * `Err(InfrastructureError)` - Invalid URL or unreachable server
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        Ok(Self { pool, config })
    }

    /// Access the underlying sqlx pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Run a trivial query to confirm the database is reachable
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }

    /// Current pool usage counters
    pub fn statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle() as u32,
            max_connections: self.config.max_connections,
        }
    }
}
