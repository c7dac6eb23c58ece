//! Token service module for device-bound session tokens
//!
//! This module handles all token-related operations including:
//! - RS256 access and refresh token issuance
//! - Ordered claim validation against the device binding registry
//! - Single-use id replay detection
//! - Bearer token authentication into a principal
//! - RS256 key management for asymmetric signing

mod config;
mod key_manager;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use key_manager::Rs256KeyPair;
pub use service::TokenService;
