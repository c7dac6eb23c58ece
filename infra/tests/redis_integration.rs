//! Integration tests for the Redis-backed stores
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p pv_infra --test redis_integration -- --ignored

use std::sync::Arc;

use uuid::Uuid;

use pv_core::errors::{DomainError, OtpError};
use pv_core::services::otp::{
    ChallengeStore, CounterStore, OtpChallengeService, OtpServiceConfig,
};
use pv_infra::cache::{CacheConfig, RedisChallengeStore, RedisClient, RedisCounterStore};
use pv_infra::sms::MockSmsProvider;

async fn redis_client() -> RedisClient {
    let config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("test:{}", Uuid::new_v4()));

    RedisClient::new(config)
        .await
        .expect("Failed to connect to Redis")
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_challenge_store_round_trip() {
    let store = RedisChallengeStore::new(redis_client().await);
    let key = format!("challenge:{}", Uuid::new_v4());

    store.put(&key, "digest-value", 300).await.unwrap();

    let stored = store.get(&key).await.unwrap();
    assert_eq!(stored, Some("digest-value".to_string()));

    store.delete(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_counter_window_semantics() {
    let store = RedisCounterStore::new(redis_client().await);
    let key = format!("send:{}", Uuid::new_v4());

    let first = store.increment_with_window(&key, 60).await.unwrap();
    assert_eq!(first, 1);

    let second = store.increment_with_window(&key, 60).await.unwrap();
    assert_eq!(second, 2);

    // The window was attached on the first increment and not extended
    let ttl = store.ttl_seconds(&key).await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 60);

    store.delete(&key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_window_set_counts_distinct_members() {
    let store = RedisCounterStore::new(redis_client().await);
    let key = format!("sources:{}", Uuid::new_v4());

    assert_eq!(store.add_to_window_set(&key, "+1111", 60).await.unwrap(), 1);
    assert_eq!(store.add_to_window_set(&key, "+2222", 60).await.unwrap(), 2);
    // Re-adding an existing member leaves the cardinality unchanged
    assert_eq!(store.add_to_window_set(&key, "+1111", 60).await.unwrap(), 2);

    store.delete(&key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_flag_round_trip() {
    let store = RedisCounterStore::new(redis_client().await);
    let key = format!("blocked:{}", Uuid::new_v4());

    assert!(!store.exists(&key).await.unwrap());

    store.set_flag(&key, 60).await.unwrap();
    assert!(store.exists(&key).await.unwrap());

    let ttl = store.ttl_seconds(&key).await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 60);

    store.delete(&key).await.unwrap();
    assert!(!store.exists(&key).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_send_and_verify_against_real_stores() {
    let client = redis_client().await;
    let counters = Arc::new(RedisCounterStore::new(client.clone()));
    let challenges = Arc::new(RedisChallengeStore::new(client));
    let sms = Arc::new(MockSmsProvider::new());

    let service = OtpChallengeService::new(
        counters,
        challenges,
        sms.clone(),
        OtpServiceConfig::default(),
    );

    let phone = "+8613812345678";
    let source = "203.0.113.9";

    let sent = service.send(phone, source).await.unwrap();
    assert!(sent.message_id.starts_with("mock_"));

    let (_, code) = sms.last_message().unwrap();

    let wrong = service.verify(phone, "000000").await;
    assert!(matches!(
        wrong,
        Err(DomainError::Otp(OtpError::InvalidOtp))
    ));

    service.verify(phone, &code).await.unwrap();

    // The challenge was consumed, so the same code no longer verifies
    let replay = service.verify(phone, &code).await;
    assert!(matches!(
        replay,
        Err(DomainError::Otp(OtpError::InvalidOtp))
    ));
}
