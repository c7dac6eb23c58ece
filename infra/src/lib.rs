//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the PhoneVerify backend,
//! following Clean Architecture principles. It provides concrete adapters for
//! the ports the core crate consumes.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL device-binding persistence using SQLx
//! - **Cache**: Redis client plus challenge and counter store adapters
//! - **SMS**: SMS dispatch providers
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)
//! - `mock-services`: Enable mock implementations for testing

#[cfg(all(feature = "mysql", feature = "redis-cache"))]
use std::sync::Arc;

// Re-export core types for convenience
pub use pv_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// SMS dispatch module - provider implementations
pub mod sms;

/// Cache module - Redis client and store adapters
pub mod cache;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services
    //!
    //! Handles:
    //! - Database connection strings
    //! - Redis configuration
    //! - SMS provider selection
    //! - Environment-specific settings

    use pv_shared::config::{cache::CacheConfig, database::DatabaseConfig};
    use serde::{Deserialize, Serialize};

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Database configuration
        pub database: DatabaseConfig,
        /// Redis cache configuration
        pub cache: CacheConfig,
        /// SMS dispatch configuration
        pub sms: SmsConfig,
    }

    /// SMS dispatch configuration
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SmsConfig {
        /// SMS provider selector ("mock")
        pub provider: String,
    }

    impl Default for InfrastructureConfig {
        fn default() -> Self {
            Self {
                database: DatabaseConfig::default(),
                cache: CacheConfig::default(),
                sms: SmsConfig {
                    provider: "mock".to_string(),
                },
            }
        }
    }
}

/// Load infrastructure configuration from environment
pub fn load_config() -> Result<config::InfrastructureConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    // Use shared config loaders
    let database = pv_shared::config::database::DatabaseConfig::from_env();
    let cache = pv_shared::config::cache::CacheConfig::from_env();

    // SMS selection stays local to infra
    let sms = config::SmsConfig {
        provider: std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
    };

    Ok(config::InfrastructureConfig {
        database,
        cache,
        sms,
    })
}

/// Infrastructure adapter container holding one instance of each port
#[cfg(all(feature = "mysql", feature = "redis-cache"))]
pub struct InfrastructureServices {
    /// Challenge store backed by Redis
    pub challenges: Arc<cache::RedisChallengeStore>,
    /// Counter store backed by Redis
    pub counters: Arc<cache::RedisCounterStore>,
    /// Device binding repository backed by MySQL
    pub device_bindings: Arc<database::MySqlDeviceBindingRepository>,
    /// SMS dispatcher selected by configuration
    pub sms: Arc<dyn pv_core::services::otp::SmsDispatcher>,
}

/// Initialize infrastructure adapters from environment configuration
///
/// This function sets up:
/// - The MySQL connection pool
/// - The Redis multiplexed connection
/// - The configured SMS dispatcher
#[cfg(all(feature = "mysql", feature = "redis-cache"))]
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let config = load_config()?;

    let redis_client = cache::RedisClient::new(config.cache.clone()).await?;
    let pool = database::DatabasePool::new(config.database.clone()).await?;
    let sms = sms::create_sms_dispatcher(&config.sms);

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        challenges: Arc::new(cache::RedisChallengeStore::new(redis_client.clone())),
        counters: Arc::new(cache::RedisCounterStore::new(redis_client)),
        device_bindings: Arc::new(database::MySqlDeviceBindingRepository::new(
            pool.pool().clone(),
        )),
        sms,
    })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}
