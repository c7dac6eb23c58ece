//! Configuration for the OTP challenge service

use pv_shared::config::OtpConfig;

/// Tunables for challenge issuance and the layered rate limiter
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of digits in a generated code
    pub code_length: usize,
    /// Lifetime of a stored challenge in seconds
    pub challenge_ttl_seconds: u64,
    /// Maximum sends per identifier within the send window
    pub max_sends_per_window: u32,
    /// Send counter window in seconds
    pub send_window_seconds: u64,
    /// Maximum verification attempts per identifier within the verify window
    pub max_verifies_per_window: u32,
    /// Verify counter window in seconds
    pub verify_window_seconds: u64,
    /// Failed verifications that trigger a block within the failure window
    pub max_failures_per_window: u32,
    /// Failure counter window in seconds
    pub failure_window_seconds: u64,
    /// Delay between consecutive sends in seconds; zero disables the cooldown
    pub cooldown_seconds: u64,
    /// Duration of the punitive block flag in seconds
    pub block_seconds: u64,
    /// Maximum distinct identifiers one source address may request codes for
    pub max_identifiers_per_source: u32,
    /// Per-source cardinality set window in seconds
    pub cardinality_window_seconds: u64,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            challenge_ttl_seconds: 300,
            max_sends_per_window: 3,
            send_window_seconds: 3600,
            max_verifies_per_window: 10,
            verify_window_seconds: 3600,
            max_failures_per_window: 5,
            failure_window_seconds: 3600,
            cooldown_seconds: 60,
            block_seconds: 3600,
            max_identifiers_per_source: 5,
            cardinality_window_seconds: 3600,
        }
    }
}

impl From<OtpConfig> for OtpServiceConfig {
    fn from(config: OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            challenge_ttl_seconds: config.challenge_ttl_seconds,
            max_sends_per_window: config.max_sends_per_window,
            send_window_seconds: config.send_window_seconds,
            max_verifies_per_window: config.max_verifies_per_window,
            verify_window_seconds: config.verify_window_seconds,
            max_failures_per_window: config.max_failures_per_window,
            failure_window_seconds: config.failure_window_seconds,
            cooldown_seconds: config.cooldown_seconds,
            block_seconds: config.block_seconds,
            max_identifiers_per_source: config.max_identifiers_per_source,
            cardinality_window_seconds: config.cardinality_window_seconds,
        }
    }
}
