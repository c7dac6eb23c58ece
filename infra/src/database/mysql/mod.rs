//! MySQL repository implementations

pub mod device_binding_repository;

pub use device_binding_repository::MySqlDeviceBindingRepository;
