//! OTP challenge module for SMS-based phone verification
//!
//! This module provides the complete one-time-code workflow including:
//! - Uniform random code generation and SMS dispatch
//! - Hashed challenge storage with expiry
//! - Layered rate limiting (cooldown, send/verify/failure counters,
//!   punitive blocking, per-source cardinality)
//! - Namespaced cache key construction
//! - Ordered structural validators for codes and phone numbers

mod config;
mod generator;
pub mod keyspace;
mod rate_limiter;
mod service;
mod traits;
mod validators;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use generator::CodeGenerator;
pub use rate_limiter::OtpRateLimiter;
pub use service::{ChallengeSent, OtpChallengeService};
pub use traits::{ChallengeStore, CounterStore, SmsDispatcher};
pub use validators::{code_validator, mobile_validator, OrderedValidator};
