//! Traits for SMS dispatch and cache-backed challenge/counter storage

use async_trait::async_trait;

/// Trait for SMS delivery integration
#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    /// Send a one-time code via SMS and return the provider message id
    async fn send_otp_sms(&self, phone: &str, code: &str) -> Result<String, String>;
}

/// Trait for storing hashed challenges with expiration
///
/// Keys are fully namespaced by the caller; implementations treat them
/// as opaque strings.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Store a code hash under the given key with a TTL
    async fn put(&self, key: &str, code_hash: &str, ttl_seconds: u64) -> Result<(), String>;
    /// Fetch the stored code hash, if any
    async fn get(&self, key: &str) -> Result<Option<String>, String>;
    /// Remove the stored challenge
    async fn delete(&self, key: &str) -> Result<(), String>;
}

/// Trait for windowed counters and flags backing the rate limiter
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment a counter, starting its expiry window only
    /// when the key is created, and return the new count
    async fn increment_with_window(&self, key: &str, window_seconds: u64) -> Result<i64, String>;
    /// Set a flag key that expires after the given TTL
    async fn set_flag(&self, key: &str, ttl_seconds: u64) -> Result<(), String>;
    /// Check whether a key currently exists
    async fn exists(&self, key: &str) -> Result<bool, String>;
    /// Get the remaining TTL for a key in seconds, if the key exists
    async fn ttl_seconds(&self, key: &str) -> Result<Option<i64>, String>;
    /// Remove a key
    async fn delete(&self, key: &str) -> Result<(), String>;
    /// Add a member to a windowed set, starting its expiry window only
    /// when the set is created, and return the set cardinality
    async fn add_to_window_set(
        &self,
        key: &str,
        member: &str,
        window_seconds: u64,
    ) -> Result<i64, String>;
}
