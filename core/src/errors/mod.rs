//! Domain-specific error types and error handling.

mod types;

// Re-export all error types and utilities
pub use types::{DeviceError, OtpError, TokenError, TokenValidationError};

use pv_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {resource}")]
    Conflict { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Returns the stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::Conflict { .. } => error_codes::CONFLICT,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Otp(e) => e.code(),
            DomainError::Device(e) => e.code(),
            DomainError::Token(e) => e.code(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.code(), self.to_string());
        match self {
            DomainError::Otp(OtpError::CoolDown { remaining_seconds }) => {
                response.add_detail("remaining_seconds", remaining_seconds)
            }
            _ => response,
        }
    }
}
