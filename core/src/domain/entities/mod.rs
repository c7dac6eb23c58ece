//! Domain entities representing core business objects.

pub mod device_binding;
pub mod token;

// Re-export commonly used types
pub use device_binding::DeviceBinding;
pub use token::{AuthenticatedPrincipal, Claims, TokenKind, TokenPair};
