//! Hashing service implementation

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};

use crate::errors::{DomainResult, OtpError};

/// Deterministic one-way digest service with constant-time comparison
///
/// Digests are SHA-256 over the UTF-8 bytes of the input, encoded as
/// URL-safe base64 without padding so the output is directly usable as a
/// cache value or key component.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingService;

impl HashingService {
    /// Create a new hashing service
    pub fn new() -> Self {
        Self
    }

    /// Computes the one-way digest of a secret
    ///
    /// # Arguments
    ///
    /// * `secret` - The value to digest (OTP code, device identifier, ...)
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - URL-safe base64 digest without padding
    /// * `Err(DomainError)` - The input was blank
    pub fn digest(&self, secret: &str) -> DomainResult<String> {
        if secret.trim().is_empty() {
            return Err(OtpError::InvalidHashInput.into());
        }

        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }

    /// Checks whether a secret digests to the given hash
    ///
    /// Recomputes the digest and compares byte-for-byte in constant time to
    /// prevent timing side-channels. Returns `false` (never errors) when
    /// either input is blank.
    pub fn matches(&self, secret: &str, hash: &str) -> bool {
        if hash.trim().is_empty() {
            return false;
        }

        match self.digest(secret) {
            Ok(computed) => constant_time_eq(computed.as_bytes(), hash.as_bytes()),
            Err(_) => false,
        }
    }

    /// Digests a batch of correlated values, preserving order
    ///
    /// Used when multiple identifiers (device fingerprint, user agent,
    /// source address) must be hashed consistently in one step.
    pub fn digest_all(&self, secrets: &[&str]) -> DomainResult<Vec<String>> {
        secrets.iter().map(|s| self.digest(s)).collect()
    }
}
