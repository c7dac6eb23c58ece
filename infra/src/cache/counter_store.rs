//! Redis-backed counter store
//!
//! Backs the rate limiter's fixed windows, punitive flags, and the
//! per-source cardinality set. The increment and set-add operations run
//! as Lua scripts inside the client so count mutation and window TTL
//! assignment cannot be torn apart by concurrent callers.

use async_trait::async_trait;

use pv_core::services::otp::CounterStore;

use crate::cache::RedisClient;

/// Flag values carry no payload, only existence and TTL
const FLAG_VALUE: &str = "1";

/// Counter store adapter over the shared Redis client
#[derive(Clone)]
pub struct RedisCounterStore {
    redis_client: RedisClient,
}

impl RedisCounterStore {
    /// Create a new counter store backed by the given client
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment_with_window(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<i64, String> {
        self.redis_client
            .increment_with_window(key, window_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn set_flag(&self, key: &str, ttl_seconds: u64) -> Result<(), String> {
        self.redis_client
            .set_with_expiry(key, FLAG_VALUE, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn exists(&self, key: &str) -> Result<bool, String> {
        self.redis_client
            .exists(key)
            .await
            .map_err(|e| e.to_string())
    }

    async fn ttl_seconds(&self, key: &str) -> Result<Option<i64>, String> {
        self.redis_client.ttl(key).await.map_err(|e| e.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.redis_client
            .delete(key)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn add_to_window_set(
        &self,
        key: &str,
        member: &str,
        window_seconds: u64,
    ) -> Result<i64, String> {
        self.redis_client
            .add_to_window_set(key, member, window_seconds)
            .await
            .map_err(|e| e.to_string())
    }
}
