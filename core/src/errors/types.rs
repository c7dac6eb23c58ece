//! Domain-specific error types for OTP verification, device binding, and
//! token management
//!
//! This module provides error type definitions for the phone verification
//! subsystem. The actual user-facing messages are configured externally in
//! the presentation layer for internationalization support; every variant
//! carries a stable machine-readable code instead.

use pv_shared::errors::error_codes;
use thiserror::Error;

/// OTP challenge and rate-limiting errors
///
/// These errors represent the failure states of the OTP send/verify state
/// machine. All of them are user-visible except `Configuration` and
/// `InvalidHashInput`, which indicate programmer or configuration mistakes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Resend cooldown active: {remaining_seconds} seconds remaining")]
    CoolDown { remaining_seconds: u64 },

    #[error("Account temporarily blocked")]
    Blocked,

    #[error("Invalid verification code")]
    InvalidOtp,

    #[error("OTP configuration error: {message}")]
    Configuration { message: String },

    #[error("Hash input must not be blank")]
    InvalidHashInput,
}

impl OtpError {
    /// Returns the stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::RateLimitExceeded => error_codes::RATE_LIMIT_EXCEEDED,
            OtpError::CoolDown { .. } => error_codes::COOLDOWN_ACTIVE,
            OtpError::Blocked => error_codes::ACCOUNT_BLOCKED,
            OtpError::InvalidOtp => error_codes::INVALID_OTP,
            OtpError::Configuration { .. } => error_codes::OTP_CONFIGURATION_ERROR,
            OtpError::InvalidHashInput => error_codes::HASH_INVALID_INPUT,
        }
    }
}

/// Device binding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Device is bound to a different account")]
    UnauthorizedDevice,
}

impl DeviceError {
    /// Returns the stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DeviceError::UnauthorizedDevice => error_codes::UNAUTHORIZED_DEVICE,
        }
    }
}

/// Reasons a token can fail validation
///
/// The validation pipeline checks these in a fixed order; the first failing
/// check determines the reason reported to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("expired")]
    Expired,

    #[error("malformed")]
    Malformed,

    #[error("invalid type")]
    InvalidType,

    #[error("invalid issuer")]
    InvalidIssuer,

    #[error("invalid device id")]
    InvalidDeviceId,

    #[error("invalid user agent")]
    InvalidUserAgent,

    #[error("invalid source address")]
    InvalidSourceAddress,

    #[error("replay detected")]
    ReplayDetected,

    #[error("unknown")]
    Unknown,
}

impl TokenValidationError {
    /// Returns the stable sub-code reported alongside the token error code
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenValidationError::Expired => "EXPIRED",
            TokenValidationError::Malformed => "MALFORMED",
            TokenValidationError::InvalidType => "INVALID_TYPE",
            TokenValidationError::InvalidIssuer => "INVALID_ISSUER",
            TokenValidationError::InvalidDeviceId => "INVALID_DEVICE_ID",
            TokenValidationError::InvalidUserAgent => "INVALID_USER_AGENT",
            TokenValidationError::InvalidSourceAddress => "INVALID_SOURCE_ADDRESS",
            TokenValidationError::ReplayDetected => "REPLAY_DETECTED",
            TokenValidationError::Unknown => "UNKNOWN",
        }
    }
}

/// Token issuance and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid access token: {reason}")]
    InvalidAccessToken { reason: TokenValidationError },

    #[error("Invalid refresh token: {reason}")]
    InvalidRefreshToken { reason: TokenValidationError },

    #[error("Key loading failed: {message}")]
    KeyLoad { message: String },

    #[error("Token generation failed: {message}")]
    Generation { message: String },
}

impl TokenError {
    /// Returns the stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidAccessToken { .. } => error_codes::INVALID_ACCESS_TOKEN,
            TokenError::InvalidRefreshToken { .. } => error_codes::INVALID_REFRESH_TOKEN,
            TokenError::KeyLoad { .. } | TokenError::Generation { .. } => {
                error_codes::INTERNAL_ERROR
            }
        }
    }

    /// Returns the validation reason, if this error carries one
    pub fn reason(&self) -> Option<TokenValidationError> {
        match self {
            TokenError::InvalidAccessToken { reason } => Some(*reason),
            TokenError::InvalidRefreshToken { reason } => Some(*reason),
            _ => None,
        }
    }
}
