//! Unit tests for the hashing service

use super::HashingService;
use crate::errors::{DomainError, OtpError};

#[test]
fn test_digest_is_deterministic() {
    let hasher = HashingService::new();

    let first = hasher.digest("1234").unwrap();
    let second = hasher.digest("1234").unwrap();
    assert_eq!(first, second);

    let other = hasher.digest("4321").unwrap();
    assert_ne!(first, other);
}

#[test]
fn test_digest_is_url_safe_without_padding() {
    let hasher = HashingService::new();
    let digest = hasher.digest("123456").unwrap();

    assert!(!digest.contains('='));
    assert!(!digest.contains('+'));
    assert!(!digest.contains('/'));
}

#[test]
fn test_digest_rejects_blank_input() {
    let hasher = HashingService::new();

    let result = hasher.digest("");
    assert!(matches!(
        result,
        Err(DomainError::Otp(OtpError::InvalidHashInput))
    ));

    let result = hasher.digest("   ");
    assert!(matches!(
        result,
        Err(DomainError::Otp(OtpError::InvalidHashInput))
    ));
}

#[test]
fn test_matches_recomputes_and_compares() {
    let hasher = HashingService::new();
    let digest = hasher.digest("1234").unwrap();

    assert!(hasher.matches("1234", &digest));
    assert!(!hasher.matches("4321", &digest));
}

#[test]
fn test_matches_is_false_on_blank_inputs() {
    let hasher = HashingService::new();
    let digest = hasher.digest("1234").unwrap();

    assert!(!hasher.matches("", &digest));
    assert!(!hasher.matches("1234", ""));
    assert!(!hasher.matches("", ""));
}

#[test]
fn test_digest_all_preserves_order() {
    let hasher = HashingService::new();

    let digests = hasher.digest_all(&["device", "agent", "address"]).unwrap();
    assert_eq!(digests.len(), 3);
    assert_eq!(digests[0], hasher.digest("device").unwrap());
    assert_eq!(digests[1], hasher.digest("agent").unwrap());
    assert_eq!(digests[2], hasher.digest("address").unwrap());
}

#[test]
fn test_digest_all_fails_on_any_blank_value() {
    let hasher = HashingService::new();

    let result = hasher.digest_all(&["device", "", "address"]);
    assert!(result.is_err());
}
