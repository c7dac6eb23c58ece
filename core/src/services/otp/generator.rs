//! Fixed-width random numeric code generation

use rand::{rngs::OsRng, Rng};

use crate::errors::{DomainResult, OtpError};

/// Generates uniformly random numeric codes of a single configured width
///
/// Codes are drawn from `[10^(length-1), 10^length - 1]` using the
/// OS-provided CSPRNG, so the result never has a leading zero and always
/// has exactly `length` digits.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    code_length: usize,
}

impl CodeGenerator {
    pub fn new(code_length: usize) -> Self {
        Self { code_length }
    }

    /// The configured code width in digits
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Generate a random code of exactly `length` digits
    ///
    /// Fails with a configuration error when `length` differs from the
    /// configured width or the configured width cannot be represented
    /// as a `u64` range.
    pub fn generate(&self, length: usize) -> DomainResult<String> {
        if length != self.code_length {
            return Err(OtpError::Configuration {
                message: format!(
                    "unsupported code length {}, generator is configured for {}",
                    length, self.code_length
                ),
            }
            .into());
        }
        if self.code_length == 0 || self.code_length > 18 {
            return Err(OtpError::Configuration {
                message: format!("code length {} out of range", self.code_length),
            }
            .into());
        }

        let lower = 10u64.pow(self.code_length as u32 - 1);
        let upper = 10u64.pow(self.code_length as u32) - 1;
        let mut rng = OsRng;
        Ok(rng.gen_range(lower..=upper).to_string())
    }
}
