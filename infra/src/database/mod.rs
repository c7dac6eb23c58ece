//! Database infrastructure
//!
//! - `connection` - MySQL pool creation and health reporting
//! - `mysql` - Repository implementations backed by MySQL

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlDeviceBindingRepository;
