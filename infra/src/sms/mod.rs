//! SMS dispatch infrastructure
//!
//! - `mock` - Recording dispatcher for development and tests
//! - `create_sms_dispatcher` - Factory selecting a provider from config

use std::sync::Arc;

use pv_core::services::otp::SmsDispatcher;

pub mod mock;

#[cfg(test)]
mod tests;

pub use mock::MockSmsProvider;

/// Build an SMS dispatcher for the configured provider
///
/// Unknown provider names fall back to the mock implementation with a
/// warning rather than failing startup.
pub fn create_sms_dispatcher(config: &crate::config::SmsConfig) -> Arc<dyn SmsDispatcher> {
    match config.provider.as_str() {
        "mock" => Arc::new(MockSmsProvider::new()),
        other => {
            tracing::warn!(provider = other, "Unknown SMS provider, using mock implementation");
            Arc::new(MockSmsProvider::new())
        }
    }
}
