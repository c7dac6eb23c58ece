//! Device binding module
//!
//! Enforces cross-subject device exclusivity and provides the
//! corroboration lookups the token service uses to check claims
//! against persisted bindings.

mod service;

#[cfg(test)]
mod tests;

pub use service::DeviceBindingService;
