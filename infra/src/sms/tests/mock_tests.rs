//! Unit tests for the mock SMS provider

use crate::config::SmsConfig;
use crate::sms::{create_sms_dispatcher, MockSmsProvider};
use pv_core::services::otp::SmsDispatcher;

#[tokio::test]
async fn test_mock_send_success() {
    let provider = MockSmsProvider::new();
    let result = provider.send_otp_sms("+1234567890", "123456").await;

    assert!(result.is_ok());
    let message_id = result.unwrap();
    assert!(message_id.starts_with("mock_"));
    assert_eq!(provider.message_count(), 1);
}

#[tokio::test]
async fn test_mock_records_last_message() {
    let provider = MockSmsProvider::new();
    provider.send_otp_sms("+1234567890", "654321").await.unwrap();

    let (phone, code) = provider.last_message().unwrap();
    assert_eq!(phone, "+1234567890");
    assert_eq!(code, "654321");
}

#[tokio::test]
async fn test_mock_invalid_phone() {
    let provider = MockSmsProvider::new();
    let result = provider.send_otp_sms("1234567890", "123456").await;

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid phone number"));
    assert_eq!(provider.message_count(), 0);
}

#[tokio::test]
async fn test_mock_simulate_failure() {
    let provider = MockSmsProvider::new();
    provider.set_simulate_failure(true);

    let result = provider.send_otp_sms("+1234567890", "123456").await;
    assert!(result.is_err());

    provider.set_simulate_failure(false);
    let result = provider.send_otp_sms("+1234567890", "123456").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_mock_counter() {
    let provider = MockSmsProvider::new();

    for i in 1..=3 {
        let _ = provider.send_otp_sms("+1234567890", "123456").await;
        assert_eq!(provider.message_count(), i);
    }

    provider.reset_counter();
    assert_eq!(provider.message_count(), 0);
}

#[test]
fn test_provider_name() {
    let provider = MockSmsProvider::new();
    assert_eq!(provider.provider_name(), "Mock");
}

#[tokio::test]
async fn test_factory_falls_back_to_mock() {
    let config = SmsConfig {
        provider: "unknown-vendor".to_string(),
    };

    let dispatcher = create_sms_dispatcher(&config);
    let result = dispatcher.send_otp_sms("+1234567890", "123456").await;
    assert!(result.is_ok());
}
