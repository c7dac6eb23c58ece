//! Redis client with multiplexed connection management and retry logic
//!
//! All operations share one multiplexed connection; clones are cheap.
//! Transient connection errors are retried with bounded exponential
//! backoff. Counter and set operations that must pair a mutation with
//! TTL assignment run as Lua scripts so the pairing is atomic.

use std::time::Duration;

use once_cell::sync::Lazy;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisError, Script};
use tracing::{debug, warn};

use pv_shared::config::cache::CacheConfig;

use crate::InfrastructureError;

/// Maximum attempts for a single Redis operation
const MAX_ATTEMPTS: u32 = 3;

/// Base delay between retries in milliseconds, doubled per attempt
const RETRY_BASE_DELAY_MS: u64 = 50;

// INCR the counter and attach the window TTL only when the key has none,
// so a pre-existing window is never extended by later increments.
static INCREMENT_WITH_WINDOW: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local count = redis.call('INCR', KEYS[1])
        if redis.call('TTL', KEYS[1]) < 0 then
            redis.call('EXPIRE', KEYS[1], ARGV[1])
        end
        return count
        "#,
    )
});

// SADD the member, attach the window TTL on first touch, return the
// resulting set cardinality.
static ADD_TO_WINDOW_SET: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        redis.call('SADD', KEYS[1], ARGV[1])
        if redis.call('TTL', KEYS[1]) < 0 then
            redis.call('EXPIRE', KEYS[1], ARGV[2])
        end
        return redis.call('SCARD', KEYS[1])
        "#,
    )
});

/// Mask credentials in a Redis URL for logging
pub fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****@{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

/// Whether an error is transient and worth retrying
pub fn is_retriable_error(error: &RedisError) -> bool {
    error.is_io_error() || error.is_timeout() || error.is_connection_dropped()
}

/// Redis client wrapping a multiplexed async connection
///
/// Keys are namespaced with the configured key prefix before hitting
/// Redis, so different deployments can share a server.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client and establish the connection
    ///
    /// # Arguments
    /// * `config` - Cache configuration with the server URL and timeouts
    ///
    /// # Returns
    /// * `Ok(RedisClient)` - Connected client
    /// * `Err(InfrastructureError)` - Invalid URL or unreachable server
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let client = redis::Client::open(config.url.as_str())?;

        let connection = tokio::time::timeout(
            Duration::from_secs(config.connection_timeout),
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            InfrastructureError::Config(format!(
                "Timed out connecting to Redis at {}",
                mask_url(&config.url)
            ))
        })??;

        debug!(url = %mask_url(&config.url), "Connected to Redis");

        Ok(Self { connection, config })
    }

    /// Store a value with an expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = self.namespaced(key);
        self.with_retry("set_with_expiry", |mut conn| {
            let key = key.clone();
            let value = value.to_string();
            async move {
                conn.set_ex::<_, _, ()>(key, value, expiry_seconds as usize)
                    .await
            }
        })
        .await
    }

    /// Fetch a value, `None` when the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.namespaced(key);
        self.with_retry("get", |mut conn| {
            let key = key.clone();
            async move { conn.get::<_, Option<String>>(key).await }
        })
        .await
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.namespaced(key);
        let removed = self
            .with_retry("delete", |mut conn| {
                let key = key.clone();
                async move { conn.del::<_, i64>(key).await }
            })
            .await?;
        Ok(removed > 0)
    }

    /// Check whether a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.namespaced(key);
        self.with_retry("exists", |mut conn| {
            let key = key.clone();
            async move { conn.exists::<_, bool>(key).await }
        })
        .await
    }

    /// Remaining time-to-live in seconds, `None` when the key is absent
    /// or carries no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let key = self.namespaced(key);
        let ttl = self
            .with_retry("ttl", |mut conn| {
                let key = key.clone();
                async move { conn.ttl::<_, i64>(key).await }
            })
            .await?;
        // Redis reports -2 for a missing key and -1 for no expiry
        Ok(if ttl < 0 { None } else { Some(ttl) })
    }

    /// Atomically increment a counter, attaching the window TTL on the
    /// first increment, and return the new count
    pub async fn increment_with_window(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<i64, InfrastructureError> {
        let key = self.namespaced(key);
        self.with_retry("increment_with_window", |mut conn| {
            let key = key.clone();
            async move {
                INCREMENT_WITH_WINDOW
                    .key(key)
                    .arg(window_seconds)
                    .invoke_async::<_, i64>(&mut conn)
                    .await
            }
        })
        .await
    }

    /// Atomically add a member to a set, attaching the window TTL on
    /// first touch, and return the distinct member count
    pub async fn add_to_window_set(
        &self,
        key: &str,
        member: &str,
        window_seconds: u64,
    ) -> Result<i64, InfrastructureError> {
        let key = self.namespaced(key);
        self.with_retry("add_to_window_set", |mut conn| {
            let key = key.clone();
            let member = member.to_string();
            async move {
                ADD_TO_WINDOW_SET
                    .key(key)
                    .arg(member)
                    .arg(window_seconds)
                    .invoke_async::<_, i64>(&mut conn)
                    .await
            }
        })
        .await
    }

    /// Ping the server to confirm it is reachable
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let reply = self
            .with_retry("health_check", |mut conn| async move {
                redis::cmd("PING").query_async::<_, String>(&mut conn).await
            })
            .await?;
        Ok(reply == "PONG")
    }

    fn namespaced(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// Run an operation, retrying transient failures with backoff
    async fn with_retry<T, F, Fut>(
        &self,
        operation: &str,
        mut run: F,
    ) -> Result<T, InfrastructureError>
    where
        F: FnMut(MultiplexedConnection) -> Fut,
        Fut: std::future::Future<Output = Result<T, RedisError>>,
    {
        let mut attempt = 1;
        loop {
            match run(self.connection.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if is_retriable_error(&e) && attempt < MAX_ATTEMPTS => {
                    let delay = RETRY_BASE_DELAY_MS << attempt;
                    warn!(
                        operation = operation,
                        error = %e,
                        attempt = attempt,
                        max_attempts = MAX_ATTEMPTS,
                        "Retriable Redis error, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
