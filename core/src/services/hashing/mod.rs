//! One-way hashing for OTP codes and correlated device identifiers

mod service;

#[cfg(test)]
mod tests;

pub use service::HashingService;
