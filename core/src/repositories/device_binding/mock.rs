//! Mock implementation of DeviceBindingRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::device_binding::DeviceBinding;
use crate::errors::DomainError;

use super::r#trait::DeviceBindingRepository;

/// Mock device binding repository for testing
///
/// Keyed by `(subject_id, device_fingerprint_hash)`, matching the composite
/// identity the real storage enforces.
pub struct MockDeviceBindingRepository {
    bindings: Arc<RwLock<HashMap<(Uuid, String), DeviceBinding>>>,
}

impl MockDeviceBindingRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            bindings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored bindings
    pub async fn len(&self) -> usize {
        self.bindings.read().await.len()
    }
}

impl Default for MockDeviceBindingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceBindingRepository for MockDeviceBindingRepository {
    async fn find_by_fingerprint(
        &self,
        device_fingerprint_hash: &str,
    ) -> Result<Option<DeviceBinding>, DomainError> {
        let bindings = self.bindings.read().await;
        Ok(bindings
            .values()
            .find(|b| b.device_fingerprint_hash == device_fingerprint_hash)
            .cloned())
    }

    async fn find_by_subject_and_fingerprint(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
    ) -> Result<Option<DeviceBinding>, DomainError> {
        let bindings = self.bindings.read().await;
        Ok(bindings
            .get(&(subject_id, device_fingerprint_hash.to_string()))
            .cloned())
    }

    async fn insert(&self, binding: DeviceBinding) -> Result<DeviceBinding, DomainError> {
        let mut bindings = self.bindings.write().await;
        let key = (binding.subject_id, binding.device_fingerprint_hash.clone());

        if bindings.contains_key(&key) {
            return Err(DomainError::Conflict {
                resource: "device_binding".to_string(),
            });
        }

        bindings.insert(key, binding.clone());
        Ok(binding)
    }

    async fn update(&self, binding: DeviceBinding) -> Result<DeviceBinding, DomainError> {
        let mut bindings = self.bindings.write().await;
        let key = (binding.subject_id, binding.device_fingerprint_hash.clone());

        match bindings.get_mut(&key) {
            Some(stored) if stored.version == binding.version => {
                let mut updated = binding;
                updated.version += 1;
                *stored = updated.clone();
                Ok(updated)
            }
            // Stale version or missing row both lose the race
            _ => Err(DomainError::Conflict {
                resource: "device_binding".to_string(),
            }),
        }
    }

    async fn is_known_user_agent(
        &self,
        subject_id: Uuid,
        user_agent_hash: &str,
    ) -> Result<bool, DomainError> {
        let bindings = self.bindings.read().await;
        Ok(bindings
            .values()
            .any(|b| b.subject_id == subject_id && b.user_agent_hash == user_agent_hash))
    }

    async fn is_known_source_address(
        &self,
        subject_id: Uuid,
        source_address_hash: &str,
    ) -> Result<bool, DomainError> {
        let bindings = self.bindings.read().await;
        Ok(bindings
            .values()
            .any(|b| b.subject_id == subject_id && b.source_address_hash == source_address_hash))
    }

    async fn is_replayed_single_use_id(
        &self,
        single_use_id_hash: &str,
    ) -> Result<bool, DomainError> {
        let bindings = self.bindings.read().await;
        Ok(bindings
            .values()
            .any(|b| b.last_single_use_id_hash == single_use_id_hash))
    }
}
