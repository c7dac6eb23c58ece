//! Ordered structural validators for OTP inputs
//!
//! Checks run in a fixed sequence and short-circuit on the first
//! failure. Order is load-bearing: blank checks must precede length
//! and format checks so the reported error code stays stable.

use pv_shared::utils::phone::is_valid_phone;
use pv_shared::utils::validation::{validators, ValidationError};

type Check = Box<dyn Fn(&str) -> Option<ValidationError> + Send + Sync>;

/// An ordered list of pure structural checks over a single input
pub struct OrderedValidator {
    checks: Vec<Check>,
}

impl OrderedValidator {
    pub fn new(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    /// Run every check in order and return the first failure
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        match self.checks.iter().find_map(|check| check(value)) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Structural checks for a submitted verification code
pub fn code_validator(code_length: usize) -> OrderedValidator {
    OrderedValidator::new(vec![
        Box::new(|code| {
            if !validators::not_empty(code) {
                Some(ValidationError::new(
                    "code",
                    "Verification code must not be blank",
                    "REQUIRED",
                ))
            } else {
                None
            }
        }),
        Box::new(move |code| {
            if !validators::length_between(code, code_length, code_length) {
                Some(ValidationError::new(
                    "code",
                    format!("Verification code must be exactly {} digits", code_length),
                    "INVALID_LENGTH",
                ))
            } else {
                None
            }
        }),
        Box::new(|code| {
            if !validators::is_numeric(code) {
                Some(ValidationError::new(
                    "code",
                    "Verification code must contain only digits",
                    "INVALID_FORMAT",
                ))
            } else {
                None
            }
        }),
    ])
}

/// Structural checks for a mobile number in E.164 form
pub fn mobile_validator() -> OrderedValidator {
    OrderedValidator::new(vec![
        Box::new(|phone| {
            if !validators::not_empty(phone) {
                Some(ValidationError::new(
                    "phone",
                    "Phone number must not be blank",
                    "REQUIRED",
                ))
            } else {
                None
            }
        }),
        Box::new(|phone| {
            if !is_valid_phone(phone) {
                Some(ValidationError::new(
                    "phone",
                    "Phone number must be in E.164 format",
                    "INVALID_FORMAT",
                ))
            } else {
                None
            }
        }),
    ])
}
