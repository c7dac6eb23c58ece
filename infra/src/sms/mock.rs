//! Mock SMS provider for development and testing

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use pv_core::services::otp::SmsDispatcher;
use pv_shared::utils::phone::{is_valid_phone, mask_phone_number};

/// SMS dispatcher that records messages instead of sending them
///
/// Counts dispatched messages and keeps the most recent one so tests
/// can read back the code that would have gone over the wire.
pub struct MockSmsProvider {
    message_count: AtomicU64,
    simulate_failure: AtomicBool,
    last_message: Mutex<Option<(String, String)>>,
}

impl MockSmsProvider {
    /// Create a mock provider that accepts every valid dispatch
    pub fn new() -> Self {
        Self {
            message_count: AtomicU64::new(0),
            simulate_failure: AtomicBool::new(false),
            last_message: Mutex::new(None),
        }
    }

    /// Number of messages dispatched so far
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Make subsequent dispatches fail
    pub fn set_simulate_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }

    /// Reset the dispatch counter to zero
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// The most recently dispatched (phone, code) pair, if any
    pub fn last_message(&self) -> Option<(String, String)> {
        self.last_message.lock().ok().and_then(|m| m.clone())
    }

    /// Provider name for logging and diagnostics
    pub fn provider_name(&self) -> &str {
        "Mock"
    }
}

impl Default for MockSmsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsDispatcher for MockSmsProvider {
    async fn send_otp_sms(&self, phone: &str, code: &str) -> Result<String, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err("Simulated SMS provider failure".to_string());
        }

        if !is_valid_phone(phone) {
            return Err(format!(
                "Invalid phone number: {}",
                mask_phone_number(phone)
            ));
        }

        self.message_count.fetch_add(1, Ordering::SeqCst);
        let message_id = format!("mock_{}", Uuid::new_v4());

        info!(
            phone = %mask_phone_number(phone),
            message_id = %message_id,
            "Mock SMS dispatched"
        );

        if let Ok(mut last) = self.last_message.lock() {
            *last = Some((phone.to_string(), code.to_string()));
        }

        Ok(message_id)
    }
}
