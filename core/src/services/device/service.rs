//! Device binding service implementation

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::DeviceBinding;
use crate::errors::{DeviceError, DomainResult};
use crate::repositories::DeviceBindingRepository;

/// Service enforcing one-binding-per-device across subjects
///
/// A device fingerprint may only ever be bound to a single subject at a
/// time; rebinding the same (subject, device) pair refreshes the stored
/// hashes instead of creating a duplicate row.
pub struct DeviceBindingService<R: DeviceBindingRepository> {
    repository: Arc<R>,
}

impl<R: DeviceBindingRepository> DeviceBindingService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Bind a device to a subject, or refresh an existing binding
    ///
    /// # Arguments
    ///
    /// * `subject_id` - The subject claiming the device
    /// * `device_fingerprint_hash` - Hashed device fingerprint
    /// * `user_agent_hash` - Hashed user agent observed at login
    /// * `source_address_hash` - Hashed network address observed at login
    /// * `single_use_id_hash` - Hash of the single-use id consumed at login
    ///
    /// # Returns
    ///
    /// * `Ok(DeviceBinding)` - The stored binding after the write
    /// * `Err(DomainError)` - `UnauthorizedDevice` when the fingerprint is
    ///   already bound to a different subject, or a storage failure
    pub async fn bind(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
        user_agent_hash: &str,
        source_address_hash: &str,
        single_use_id_hash: &str,
    ) -> DomainResult<DeviceBinding> {
        if let Some(existing) = self
            .repository
            .find_by_fingerprint(device_fingerprint_hash)
            .await?
        {
            if existing.subject_id != subject_id {
                tracing::warn!(
                    subject_id = %subject_id,
                    bound_subject_id = %existing.subject_id,
                    event = "device_rebind_rejected",
                    "Device fingerprint is already bound to another subject"
                );
                return Err(DeviceError::UnauthorizedDevice.into());
            }
        }

        match self
            .repository
            .find_by_subject_and_fingerprint(subject_id, device_fingerprint_hash)
            .await?
        {
            None => {
                let binding = DeviceBinding::new(
                    subject_id,
                    device_fingerprint_hash.to_string(),
                    user_agent_hash.to_string(),
                    source_address_hash.to_string(),
                    single_use_id_hash.to_string(),
                );
                let stored = self.repository.insert(binding).await?;
                tracing::info!(
                    subject_id = %subject_id,
                    event = "device_bound",
                    "Created device binding"
                );
                Ok(stored)
            }
            Some(mut binding) => {
                binding.record_use(
                    user_agent_hash.to_string(),
                    source_address_hash.to_string(),
                    single_use_id_hash.to_string(),
                );
                let stored = self.repository.update(binding).await?;
                tracing::info!(
                    subject_id = %subject_id,
                    event = "device_binding_refreshed",
                    "Refreshed existing device binding"
                );
                Ok(stored)
            }
        }
    }

    /// Check whether the device fingerprint is bound to the subject
    pub async fn is_known_device(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
    ) -> DomainResult<bool> {
        self.repository
            .is_known_device(subject_id, device_fingerprint_hash)
            .await
    }

    /// Check whether the user agent hash matches a binding of the subject
    pub async fn is_known_user_agent(
        &self,
        subject_id: Uuid,
        user_agent_hash: &str,
    ) -> DomainResult<bool> {
        self.repository
            .is_known_user_agent(subject_id, user_agent_hash)
            .await
    }

    /// Check whether the source address hash matches a binding of the subject
    pub async fn is_known_source_address(
        &self,
        subject_id: Uuid,
        source_address_hash: &str,
    ) -> DomainResult<bool> {
        self.repository
            .is_known_source_address(subject_id, source_address_hash)
            .await
    }

    /// Check whether a single-use id hash has already been consumed
    pub async fn is_replayed_single_use_id(&self, single_use_id_hash: &str) -> DomainResult<bool> {
        self.repository
            .is_replayed_single_use_id(single_use_id_hash)
            .await
    }
}
