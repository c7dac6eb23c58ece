//! OTP challenge orchestration

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pv_shared::utils::phone::mask_phone_number;

use crate::errors::{DomainError, DomainResult, OtpError};
use crate::services::hashing::HashingService;

use super::config::OtpServiceConfig;
use super::generator::CodeGenerator;
use super::keyspace;
use super::rate_limiter::OtpRateLimiter;
use super::traits::{ChallengeStore, CounterStore, SmsDispatcher};
use super::validators::{mobile_validator, OrderedValidator};

/// Result of a successful challenge dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSent {
    /// Message id returned by the SMS provider
    pub message_id: String,
    /// Seconds until the stored challenge expires
    pub expires_in_seconds: u64,
}

/// Service for issuing and verifying one-time codes
///
/// Composes the rate limiter, challenge store, hashing service and code
/// generator. At most one live challenge exists per identifier; a new
/// send overwrites the previous one.
pub struct OtpChallengeService<C, S, M>
where
    C: CounterStore,
    S: ChallengeStore,
    M: SmsDispatcher,
{
    /// Layered abuse controls
    rate_limiter: OtpRateLimiter<C>,
    /// Storage for hashed challenges
    challenges: Arc<S>,
    /// SMS delivery collaborator
    sms: Arc<M>,
    /// One-way digest of codes
    hasher: HashingService,
    /// Random code source
    generator: CodeGenerator,
    /// Service configuration
    config: OtpServiceConfig,
    /// Structural checks for the target phone number
    phone_checks: OrderedValidator,
}

impl<C, S, M> OtpChallengeService<C, S, M>
where
    C: CounterStore,
    S: ChallengeStore,
    M: SmsDispatcher,
{
    /// Create a new OTP challenge service
    ///
    /// # Arguments
    ///
    /// * `counters` - Counter store backing the rate limiter
    /// * `challenges` - Challenge store implementation
    /// * `sms` - SMS dispatch implementation
    /// * `config` - Service configuration
    pub fn new(counters: Arc<C>, challenges: Arc<S>, sms: Arc<M>, config: OtpServiceConfig) -> Self {
        let rate_limiter = OtpRateLimiter::new(counters, config.clone());
        let generator = CodeGenerator::new(config.code_length);
        Self {
            rate_limiter,
            challenges,
            sms,
            hasher: HashingService::new(),
            generator,
            config,
            phone_checks: mobile_validator(),
        }
    }

    /// Issue a one-time code to an identifier
    ///
    /// This method:
    /// 1. Validates the identifier format
    /// 2. Runs the send-side rate checks (cardinality, cooldown, send count)
    /// 3. Generates and digests a new code
    /// 4. Stores the digest with the challenge TTL
    /// 5. Dispatches the raw code via SMS, then starts the cooldown
    ///
    /// # Arguments
    ///
    /// * `identifier` - The phone number to send the code to (E.164 format)
    /// * `source_address` - The network address originating the request
    ///
    /// # Returns
    ///
    /// * `Ok(ChallengeSent)` - Provider message id and challenge lifetime
    /// * `Err(DomainError)` - If validation, rate checks or dispatch fail
    pub async fn send(&self, identifier: &str, source_address: &str) -> DomainResult<ChallengeSent> {
        if let Err(error) = self.phone_checks.validate(identifier) {
            return Err(DomainError::Validation {
                message: error.message,
            });
        }

        self.rate_limiter
            .check_send_allowed(identifier, source_address)
            .await?;

        let code = self.generator.generate(self.config.code_length)?;
        let digest = self.hasher.digest(&code)?;

        let challenge_key = keyspace::challenge(identifier)?;
        self.challenges
            .put(&challenge_key, &digest, self.config.challenge_ttl_seconds)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %mask_phone_number(identifier),
                    error = %e,
                    event = "challenge_storage_failed",
                    "Failed to store hashed challenge"
                );
                DomainError::Internal {
                    message: format!("Failed to store challenge: {}", e),
                }
            })?;

        match self.sms.send_otp_sms(identifier, &code).await {
            Err(e) => {
                // Roll back the stored challenge so the caller can retry
                // immediately; the cooldown has not started yet.
                let _ = self.challenges.delete(&challenge_key).await;
                tracing::error!(
                    phone = %mask_phone_number(identifier),
                    error = %e,
                    event = "sms_dispatch_failed",
                    "Failed to dispatch verification code"
                );
                Err(DomainError::Internal {
                    message: format!("Failed to dispatch verification code: {}", e),
                })
            }
            Ok(message_id) => {
                self.rate_limiter.start_cooldown(identifier).await?;
                tracing::info!(
                    phone = %mask_phone_number(identifier),
                    message_id = %message_id,
                    event = "otp_challenge_sent",
                    "Verification code dispatched"
                );
                Ok(ChallengeSent {
                    message_id,
                    expires_in_seconds: self.config.challenge_ttl_seconds,
                })
            }
        }
    }

    /// Verify a submitted code against the stored challenge
    ///
    /// This method:
    /// 1. Runs the verify-side rate checks (block flag, format, verify count)
    /// 2. Looks up the stored digest for the identifier
    /// 3. Compares in constant time; mismatches record a failure
    /// 4. On match, deletes the challenge and clears all counters
    ///
    /// # Arguments
    ///
    /// * `identifier` - The phone number the code was sent to
    /// * `submitted_code` - The code provided by the caller
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The code matched the live challenge
    /// * `Err(DomainError)` - Rate check failure or a missing/wrong code
    pub async fn verify(&self, identifier: &str, submitted_code: &str) -> DomainResult<()> {
        self.rate_limiter
            .check_verify_allowed(identifier, submitted_code)
            .await?;

        let challenge_key = keyspace::challenge(identifier)?;
        let stored = self
            .challenges
            .get(&challenge_key)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load challenge: {}", e),
            })?;

        // Missing and mismatched challenges report the same error so a
        // caller cannot probe which identifiers have live codes.
        let digest = match stored {
            Some(digest) => digest,
            None => {
                self.rate_limiter.record_failure(identifier).await?;
                tracing::warn!(
                    phone = %mask_phone_number(identifier),
                    event = "otp_verification_failed",
                    "No live challenge for identifier"
                );
                return Err(OtpError::InvalidOtp.into());
            }
        };

        if !self.hasher.matches(submitted_code, &digest) {
            self.rate_limiter.record_failure(identifier).await?;
            tracing::warn!(
                phone = %mask_phone_number(identifier),
                event = "otp_verification_failed",
                "Submitted code did not match the live challenge"
            );
            return Err(OtpError::InvalidOtp.into());
        }

        self.challenges
            .delete(&challenge_key)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete challenge: {}", e),
            })?;
        self.rate_limiter.record_success(identifier).await?;

        tracing::info!(
            phone = %mask_phone_number(identifier),
            event = "otp_verified",
            "Verification code accepted"
        );
        Ok(())
    }
}
