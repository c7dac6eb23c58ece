//! Tests for the OTP challenge service

use std::sync::Arc;

use crate::errors::{DomainError, OtpError};
use crate::services::otp::{OtpChallengeService, OtpServiceConfig};

use super::mocks::{MockChallengeStore, MockCounterStore, MockSmsDispatcher};

const PHONE: &str = "+8613812345678";
const SOURCE: &str = "203.0.113.7";

// A structurally valid code the generator can never produce, since
// generated codes have no leading zero.
const WRONG_CODE: &str = "000000";

type TestService = OtpChallengeService<MockCounterStore, MockChallengeStore, MockSmsDispatcher>;

fn setup(
    config: OtpServiceConfig,
) -> (
    TestService,
    Arc<MockCounterStore>,
    Arc<MockChallengeStore>,
    Arc<MockSmsDispatcher>,
) {
    let counters = Arc::new(MockCounterStore::new());
    let challenges = Arc::new(MockChallengeStore::new());
    let sms = Arc::new(MockSmsDispatcher::new());
    let service = OtpChallengeService::new(
        Arc::clone(&counters),
        Arc::clone(&challenges),
        Arc::clone(&sms),
        config,
    );
    (service, counters, challenges, sms)
}

#[tokio::test]
async fn test_send_dispatches_code_and_stores_challenge() {
    let (service, _, challenges, sms) = setup(OtpServiceConfig::default());

    let sent = service.send(PHONE, SOURCE).await.unwrap();
    assert!(sent.message_id.starts_with("mock-msg-"));
    assert_eq!(sent.expires_in_seconds, 300);

    assert!(challenges.contains("challenge:+8613812345678"));
    assert_eq!(challenges.ttl_of("challenge:+8613812345678"), Some(300));

    let code = sms.last_code(PHONE).unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_send_then_verify_round_trip() {
    let (service, _, challenges, sms) = setup(OtpServiceConfig::default());

    service.send(PHONE, SOURCE).await.unwrap();
    let code = sms.last_code(PHONE).unwrap();

    service.verify(PHONE, &code).await.unwrap();
    assert!(!challenges.contains("challenge:+8613812345678"));

    // The challenge is consumed, so replaying the same code fails
    let err = service.verify(PHONE, &code).await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtp)));
}

#[tokio::test]
async fn test_resend_during_cooldown_rejected() {
    let (service, _, _, _) = setup(OtpServiceConfig::default());

    service.send(PHONE, SOURCE).await.unwrap();
    let err = service.send(PHONE, SOURCE).await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::CoolDown { .. })));
}

#[tokio::test]
async fn test_fourth_send_exceeds_window_maximum() {
    let mut config = OtpServiceConfig::default();
    config.cooldown_seconds = 0;
    config.max_sends_per_window = 3;
    let (service, _, _, sms) = setup(config);

    for _ in 0..3 {
        service.send(PHONE, SOURCE).await.unwrap();
    }

    let err = service.send(PHONE, SOURCE).await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::RateLimitExceeded)));
    assert_eq!(sms.sent_count(), 3);
}

#[tokio::test]
async fn test_wrong_code_records_failure() {
    let (service, counters, _, _) = setup(OtpServiceConfig::default());

    service.send(PHONE, SOURCE).await.unwrap();
    let err = service.verify(PHONE, WRONG_CODE).await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtp)));
    assert_eq!(counters.count("failureCount:+8613812345678"), 1);
}

#[tokio::test]
async fn test_correct_code_rejected_once_blocked() {
    let (service, _, _, sms) = setup(OtpServiceConfig::default());

    service.send(PHONE, SOURCE).await.unwrap();
    let code = sms.last_code(PHONE).unwrap();

    for _ in 0..5 {
        let err = service.verify(PHONE, WRONG_CODE).await.unwrap_err();
        assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtp)));
    }

    // The failure threshold has blocked the identifier, so even the
    // right code is rejected now
    let err = service.verify(PHONE, &code).await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::Blocked)));
}

#[tokio::test]
async fn test_missing_challenge_reports_invalid_otp() {
    let (service, counters, _, _) = setup(OtpServiceConfig::default());

    let err = service.verify(PHONE, "123456").await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtp)));
    assert_eq!(counters.count("failureCount:+8613812345678"), 1);
}

#[tokio::test]
async fn test_malformed_code_skips_rate_counters() {
    let (service, counters, _, _) = setup(OtpServiceConfig::default());

    service.send(PHONE, SOURCE).await.unwrap();
    let err = service.verify(PHONE, "12ab").await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtp)));
    assert_eq!(counters.count("verifyCount:+8613812345678"), 0);
    assert_eq!(counters.count("failureCount:+8613812345678"), 0);
}

#[tokio::test]
async fn test_sms_failure_rolls_back_challenge() {
    let (service, counters, challenges, sms) = setup(OtpServiceConfig::default());
    sms.set_failing(true);

    let err = service.send(PHONE, SOURCE).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
    assert!(!challenges.contains("challenge:+8613812345678"));
    assert!(!counters.contains("cooldown:+8613812345678"));

    // The caller can retry immediately once the provider recovers
    sms.set_failing(false);
    service.send(PHONE, SOURCE).await.unwrap();
    assert!(challenges.contains("challenge:+8613812345678"));
}

#[tokio::test]
async fn test_invalid_phone_rejected_before_dispatch() {
    let (service, _, _, sms) = setup(OtpServiceConfig::default());

    let err = service.send("12345", SOURCE).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert_eq!(sms.sent_count(), 0);
}

#[tokio::test]
async fn test_success_resets_rate_state() {
    let (service, counters, _, sms) = setup(OtpServiceConfig::default());

    service.send(PHONE, SOURCE).await.unwrap();
    let code = sms.last_code(PHONE).unwrap();
    service.verify(PHONE, &code).await.unwrap();

    assert!(!counters.contains("sendCount:+8613812345678"));
    assert!(!counters.contains("cooldown:+8613812345678"));

    // A new challenge can be requested without waiting out the cooldown
    service.send(PHONE, SOURCE).await.unwrap();
}

#[tokio::test]
async fn test_source_fanout_capped() {
    let mut config = OtpServiceConfig::default();
    config.cooldown_seconds = 0;
    config.max_identifiers_per_source = 2;
    let (service, _, _, _) = setup(config);

    service.send("+8613800000001", SOURCE).await.unwrap();
    service.send("+8613800000002", SOURCE).await.unwrap();

    let err = service.send("+8613800000003", SOURCE).await.unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::RateLimitExceeded)));
}
