//! Redis-backed challenge store
//!
//! Persists hashed challenge codes under their namespace keys with the
//! TTL the caller supplies. Raw codes never reach this adapter.

use async_trait::async_trait;

use pv_core::services::otp::ChallengeStore;

use crate::cache::RedisClient;

/// Challenge store adapter over the shared Redis client
#[derive(Clone)]
pub struct RedisChallengeStore {
    redis_client: RedisClient,
}

impl RedisChallengeStore {
    /// Create a new challenge store backed by the given client
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }
}

#[async_trait]
impl ChallengeStore for RedisChallengeStore {
    async fn put(&self, key: &str, code_hash: &str, ttl_seconds: u64) -> Result<(), String> {
        self.redis_client
            .set_with_expiry(key, code_hash, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.redis_client.get(key).await.map_err(|e| e.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.redis_client
            .delete(key)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
