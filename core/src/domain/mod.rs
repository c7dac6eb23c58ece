//! Domain layer containing business entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{AuthenticatedPrincipal, Claims, DeviceBinding, TokenKind, TokenPair};
