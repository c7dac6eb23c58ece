//! Cache module for Redis-based storage
//!
//! This module provides the Redis client plus the adapters that satisfy
//! the core crate's challenge store and counter store ports, including
//! connection management, retry logic, and scripted atomic counters.

pub mod challenge_store;
pub mod counter_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use challenge_store::RedisChallengeStore;
pub use counter_store::RedisCounterStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use pv_shared::config::cache::CacheConfig;
