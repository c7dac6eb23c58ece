//! Example: issuing and verifying one-time codes against Redis
//!
//! Wires the challenge service to Redis-backed stores and the mock SMS
//! provider, then walks one send/verify cycle including a cooldown
//! rejection and a wrong guess.
//!
//! Requires a running Redis instance (REDIS_URL, default localhost).
//! Run with: cargo run --example otp_challenge_demo -p pv_infra

use std::sync::Arc;

use pv_core::errors::{DomainError, OtpError};
use pv_core::services::otp::{OtpChallengeService, OtpServiceConfig};
use pv_infra::cache::{CacheConfig, RedisChallengeStore, RedisClient, RedisCounterStore};
use pv_infra::sms::MockSmsProvider;
use pv_shared::config::{Environment, LoggingConfig};
use pv_shared::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let _ = init_tracing(&LoggingConfig::for_environment(Environment::Development));

    let cache_config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix("demo");

    let client = RedisClient::new(cache_config).await?;
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
    let source = "203.0.113.50";

    println!("=== Sending a verification code ===");
    let sent = service.send(phone, source).await?;
    println!(
        "Dispatched message {} (expires in {}s)",
        sent.message_id, sent.expires_in_seconds
    );

    let (_, code) = sms.last_message().expect("mock recorded the dispatch");
    println!("Code delivered to the device: {}", code);

    println!("\n=== Re-sending inside the cooldown ===");
    match service.send(phone, source).await {
        Err(DomainError::Otp(OtpError::CoolDown { remaining_seconds })) => {
            println!("Blocked for another {}s", remaining_seconds)
        }
        other => println!("Unexpected outcome: {:?}", other),
    }

    println!("\n=== Submitting a wrong guess ===");
    match service.verify(phone, "000000").await {
        Err(DomainError::Otp(OtpError::InvalidOtp)) => println!("Rejected as expected"),
        other => println!("Unexpected outcome: {:?}", other),
    }

    println!("\n=== Submitting the real code ===");
    service.verify(phone, &code).await?;
    println!("Verified, all rate-limit state cleared");

    Ok(())
}
