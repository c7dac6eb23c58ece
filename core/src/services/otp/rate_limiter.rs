//! Layered abuse controls for OTP issuance and verification
//!
//! State lives entirely in windowed cache counters and flags; there are
//! no in-process locks. Send-side checks run in order: per-source
//! cardinality, cooldown, send counter. Verify-side checks run in
//! order: block flag, code format, verify counter. Two independent
//! counters (verify volume and failed matches) can each set the block
//! flag.

use std::sync::Arc;

use pv_shared::utils::phone::mask_phone_number;

use crate::errors::{DomainError, DomainResult, OtpError};

use super::config::OtpServiceConfig;
use super::keyspace;
use super::traits::CounterStore;
use super::validators::{code_validator, OrderedValidator};

pub struct OtpRateLimiter<C: CounterStore> {
    counters: Arc<C>,
    config: OtpServiceConfig,
    code_checks: OrderedValidator,
}

impl<C: CounterStore> OtpRateLimiter<C> {
    pub fn new(counters: Arc<C>, config: OtpServiceConfig) -> Self {
        let code_checks = code_validator(config.code_length);
        Self {
            counters,
            config,
            code_checks,
        }
    }

    /// Run the send-side checks in their fixed order
    pub async fn check_send_allowed(
        &self,
        identifier: &str,
        source_address: &str,
    ) -> DomainResult<()> {
        self.check_cardinality(identifier, source_address).await?;
        self.check_cooldown(identifier).await?;
        self.check_send_count(identifier).await
    }

    async fn check_cardinality(&self, identifier: &str, source_address: &str) -> DomainResult<()> {
        let key = keyspace::cardinality(source_address)?;
        let member = hash_identifier(identifier);
        let distinct = self
            .counters
            .add_to_window_set(&key, &member, self.config.cardinality_window_seconds)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update cardinality set: {}", e),
            })?;

        if distinct > self.config.max_identifiers_per_source as i64 {
            tracing::warn!(
                source_address = source_address,
                distinct_identifiers = distinct,
                event = "cardinality_limit_exceeded",
                "Source address requested codes for too many identifiers"
            );
            return Err(OtpError::RateLimitExceeded.into());
        }
        Ok(())
    }

    async fn check_cooldown(&self, identifier: &str) -> DomainResult<()> {
        let key = keyspace::cooldown(identifier)?;
        let active = self
            .counters
            .exists(&key)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check cooldown flag: {}", e),
            })?;

        if active {
            let remaining = self
                .counters
                .ttl_seconds(&key)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to read cooldown TTL: {}", e),
                })?
                .unwrap_or(0)
                .max(0) as u64;
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                cooldown_remaining = remaining,
                event = "cooldown_active",
                "Resend attempted before cooldown expiry"
            );
            return Err(OtpError::CoolDown {
                remaining_seconds: remaining,
            }
            .into());
        }
        Ok(())
    }

    async fn check_send_count(&self, identifier: &str) -> DomainResult<()> {
        let key = keyspace::send_count(identifier)?;
        let count = self
            .counters
            .increment_with_window(&key, self.config.send_window_seconds)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to increment send counter: {}", e),
            })?;

        if count > self.config.max_sends_per_window as i64 {
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                send_count = count,
                event = "send_limit_exceeded",
                "Send counter exceeded the configured window maximum"
            );
            return Err(OtpError::RateLimitExceeded.into());
        }
        Ok(())
    }

    /// Set the resend cooldown flag; a zero duration disables the cooldown
    pub async fn start_cooldown(&self, identifier: &str) -> DomainResult<()> {
        if self.config.cooldown_seconds == 0 {
            return Ok(());
        }
        let key = keyspace::cooldown(identifier)?;
        self.counters
            .set_flag(&key, self.config.cooldown_seconds)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to set cooldown flag: {}", e),
            })
    }

    /// Run the verify-side checks in their fixed order
    ///
    /// Structural code failures short-circuit before any counter moves,
    /// so malformed submissions cannot burn through the verify window.
    pub async fn check_verify_allowed(
        &self,
        identifier: &str,
        submitted_code: &str,
    ) -> DomainResult<()> {
        let blocked_key = keyspace::blocked(identifier)?;
        let blocked = self
            .counters
            .exists(&blocked_key)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to check block flag: {}", e),
            })?;
        if blocked {
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                event = "verification_blocked",
                "Verification attempted while the identifier is blocked"
            );
            return Err(OtpError::Blocked.into());
        }

        if let Err(error) = self.code_checks.validate(submitted_code) {
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                reason = %error.code,
                event = "invalid_code_format",
                "Submitted code failed structural validation"
            );
            return Err(OtpError::InvalidOtp.into());
        }

        let verify_key = keyspace::verify_count(identifier)?;
        let count = self
            .counters
            .increment_with_window(&verify_key, self.config.verify_window_seconds)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to increment verify counter: {}", e),
            })?;

        if count > self.config.max_verifies_per_window as i64 {
            self.counters
                .set_flag(&blocked_key, self.config.block_seconds)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to set block flag: {}", e),
                })?;
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                verify_count = count,
                event = "verify_limit_exceeded",
                "Verify counter exceeded the configured window maximum"
            );
            return Err(OtpError::RateLimitExceeded.into());
        }
        Ok(())
    }

    /// Record a failed verification, blocking the identifier once the
    /// failure threshold is reached
    pub async fn record_failure(&self, identifier: &str) -> DomainResult<()> {
        let key = keyspace::failure_count(identifier)?;
        let count = self
            .counters
            .increment_with_window(&key, self.config.failure_window_seconds)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to increment failure counter: {}", e),
            })?;

        if count >= self.config.max_failures_per_window as i64 {
            let blocked_key = keyspace::blocked(identifier)?;
            self.counters
                .set_flag(&blocked_key, self.config.block_seconds)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to set block flag: {}", e),
                })?;
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                failure_count = count,
                event = "identifier_blocked",
                "Failure threshold reached, identifier blocked"
            );
        }
        Ok(())
    }

    /// Clear every counter and flag for the identifier after a
    /// successful verification
    pub async fn record_success(&self, identifier: &str) -> DomainResult<()> {
        let keys = [
            keyspace::verify_count(identifier)?,
            keyspace::failure_count(identifier)?,
            keyspace::blocked(identifier)?,
            keyspace::send_count(identifier)?,
            keyspace::cooldown(identifier)?,
        ];
        for key in &keys {
            self.counters
                .delete(key)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to clear rate limit state: {}", e),
                })?;
        }
        Ok(())
    }
}

/// Hash an identifier before it becomes a cardinality set member, so
/// raw phone numbers never land in the cache
fn hash_identifier(identifier: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}
