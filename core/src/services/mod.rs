//! Business services containing domain logic and use cases.

pub mod device;
pub mod hashing;
pub mod otp;
pub mod token;

// Re-export commonly used types
pub use device::DeviceBindingService;
pub use hashing::HashingService;
pub use otp::{
    ChallengeSent, ChallengeStore, CodeGenerator, CounterStore, OtpChallengeService,
    OtpRateLimiter, OtpServiceConfig, SmsDispatcher,
};
pub use token::{Rs256KeyPair, TokenService, TokenServiceConfig};
