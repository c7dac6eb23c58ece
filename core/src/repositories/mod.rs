pub mod device_binding;

pub use device_binding::DeviceBindingRepository;

#[cfg(test)]
pub use device_binding::MockDeviceBindingRepository;
