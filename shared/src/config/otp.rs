//! OTP issuance and abuse-control configuration

use serde::{Deserialize, Serialize};

use crate::utils::validation::{Validate, ValidationErrors};

/// Configuration for the OTP challenge lifecycle and its rate limits.
///
/// Every window and duration is expressed in seconds. Each cache counter
/// receives its TTL exactly once, when the counter is created.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in a verification code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Lifetime of a stored challenge in seconds
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_seconds: u64,

    /// Maximum send operations per identifier within the send window
    #[serde(default = "default_max_sends")]
    pub max_sends_per_window: u32,

    /// Send counter window in seconds
    #[serde(default = "default_window")]
    pub send_window_seconds: u64,

    /// Maximum verify operations per identifier within the verify window
    #[serde(default = "default_max_verifies")]
    pub max_verifies_per_window: u32,

    /// Verify counter window in seconds
    #[serde(default = "default_window")]
    pub verify_window_seconds: u64,

    /// Failed attempts per identifier that trigger a punitive block
    #[serde(default = "default_max_failures")]
    pub max_failures_per_window: u32,

    /// Failure counter window in seconds
    #[serde(default = "default_window")]
    pub failure_window_seconds: u64,

    /// Minimum wait between consecutive sends, in seconds (0 disables)
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,

    /// Punitive block duration in seconds
    #[serde(default = "default_block")]
    pub block_seconds: u64,

    /// Distinct identifiers one source address may request codes for
    #[serde(default = "default_max_identifiers")]
    pub max_identifiers_per_source: u32,

    /// Per-source cardinality set window in seconds
    #[serde(default = "default_window")]
    pub cardinality_window_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            challenge_ttl_seconds: default_challenge_ttl(),
            max_sends_per_window: default_max_sends(),
            send_window_seconds: default_window(),
            max_verifies_per_window: default_max_verifies(),
            verify_window_seconds: default_window(),
            max_failures_per_window: default_max_failures(),
            failure_window_seconds: default_window(),
            cooldown_seconds: default_cooldown(),
            block_seconds: default_block(),
            max_identifiers_per_source: default_max_identifiers(),
            cardinality_window_seconds: default_window(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        fn var<T: std::str::FromStr>(name: &str, fallback: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        }

        let defaults = Self::default();
        Self {
            code_length: var("OTP_CODE_LENGTH", defaults.code_length),
            challenge_ttl_seconds: var("OTP_CHALLENGE_TTL_SECONDS", defaults.challenge_ttl_seconds),
            max_sends_per_window: var("OTP_MAX_SENDS_PER_WINDOW", defaults.max_sends_per_window),
            send_window_seconds: var("OTP_SEND_WINDOW_SECONDS", defaults.send_window_seconds),
            max_verifies_per_window: var("OTP_MAX_VERIFIES_PER_WINDOW", defaults.max_verifies_per_window),
            verify_window_seconds: var("OTP_VERIFY_WINDOW_SECONDS", defaults.verify_window_seconds),
            max_failures_per_window: var("OTP_MAX_FAILURES_PER_WINDOW", defaults.max_failures_per_window),
            failure_window_seconds: var("OTP_FAILURE_WINDOW_SECONDS", defaults.failure_window_seconds),
            cooldown_seconds: var("OTP_COOLDOWN_SECONDS", defaults.cooldown_seconds),
            block_seconds: var("OTP_BLOCK_SECONDS", defaults.block_seconds),
            max_identifiers_per_source: var("OTP_MAX_IDENTIFIERS_PER_SOURCE", defaults.max_identifiers_per_source),
            cardinality_window_seconds: var("OTP_CARDINALITY_WINDOW_SECONDS", defaults.cardinality_window_seconds),
        }
    }

    /// Relaxed limits for development environments
    pub fn development() -> Self {
        Self {
            cooldown_seconds: 5,
            block_seconds: 60,
            ..Default::default()
        }
    }

    /// Production limits are the defaults
    pub fn production() -> Self {
        Self::default()
    }
}

impl Validate for OtpConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.code_length < 4 || self.code_length > 10 {
            errors.add_error("code_length", "must be between 4 and 10", "OUT_OF_RANGE");
        }
        if self.challenge_ttl_seconds == 0 {
            errors.add_error("challenge_ttl_seconds", "must be positive", "OUT_OF_RANGE");
        }
        if self.max_sends_per_window == 0 {
            errors.add_error("max_sends_per_window", "must be positive", "OUT_OF_RANGE");
        }
        if self.max_failures_per_window == 0 {
            errors.add_error("max_failures_per_window", "must be positive", "OUT_OF_RANGE");
        }
        if self.block_seconds == 0 {
            errors.add_error("block_seconds", "must be positive", "OUT_OF_RANGE");
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_challenge_ttl() -> u64 {
    300
}

fn default_max_sends() -> u32 {
    3
}

fn default_max_verifies() -> u32 {
    10
}

fn default_max_failures() -> u32 {
    5
}

fn default_window() -> u64 {
    3600
}

fn default_cooldown() -> u64 {
    60
}

fn default_block() -> u64 {
    3600
}

fn default_max_identifiers() -> u32 {
    5
}
