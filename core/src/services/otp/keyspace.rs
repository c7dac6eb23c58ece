//! Namespaced cache key construction for OTP state
//!
//! Every challenge, counter and flag lives in a shared cache, so each
//! key carries a kind prefix. Identifiers are validated as non-blank
//! before any key reaches the cache; a blank identifier at this depth
//! means an upstream validation bug, so it surfaces as a configuration
//! error rather than a user-facing one.

use crate::errors::{DomainResult, OtpError};

fn validated(prefix: &str, id: &str) -> DomainResult<String> {
    if id.trim().is_empty() {
        return Err(OtpError::Configuration {
            message: format!("blank identifier for {} key", prefix),
        }
        .into());
    }
    Ok(format!("{}:{}", prefix, id))
}

/// Key holding the hashed challenge for an identifier
pub fn challenge(id: &str) -> DomainResult<String> {
    validated("challenge", id)
}

/// Key holding the resend cooldown flag for an identifier
pub fn cooldown(id: &str) -> DomainResult<String> {
    validated("cooldown", id)
}

/// Key holding the windowed send counter for an identifier
pub fn send_count(id: &str) -> DomainResult<String> {
    validated("sendCount", id)
}

/// Key holding the windowed verify counter for an identifier
pub fn verify_count(id: &str) -> DomainResult<String> {
    validated("verifyCount", id)
}

/// Key holding the windowed failure counter for an identifier
pub fn failure_count(id: &str) -> DomainResult<String> {
    validated("failureCount", id)
}

/// Key holding the punitive block flag for an identifier
pub fn blocked(id: &str) -> DomainResult<String> {
    validated("blocked", id)
}

/// Key holding the set of identifiers requested by a source address
pub fn cardinality(source: &str) -> DomainResult<String> {
    validated("cardinality", source)
}
