//! Device binding repository trait defining the interface for binding persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::device_binding::DeviceBinding;
use crate::errors::DomainError;

/// Repository trait for DeviceBinding entity persistence operations
///
/// This trait defines the contract for managing device bindings in the
/// database. A binding's identity is the composite
/// `(subject_id, device_fingerprint_hash)`; implementations must enforce it
/// as a unique key and apply optimistic versioning on updates.
///
/// # Security Considerations
/// - Fingerprint, user agent, source address, and single-use id values are
///   stored pre-hashed; raw values never reach the repository
/// - A lost optimistic-version race must surface as a conflict error, never
///   as a silent overwrite
#[async_trait]
pub trait DeviceBindingRepository: Send + Sync {
    /// Find the binding for a device fingerprint, regardless of subject
    ///
    /// Used to enforce cross-subject exclusivity: a fingerprint bound under
    /// one subject must not be silently rebound under another.
    ///
    /// # Arguments
    /// * `device_fingerprint_hash` - The hashed device fingerprint
    ///
    /// # Returns
    /// * `Ok(Some(DeviceBinding))` - The fingerprint is bound
    /// * `Ok(None)` - The fingerprint is unknown
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_fingerprint(
        &self,
        device_fingerprint_hash: &str,
    ) -> Result<Option<DeviceBinding>, DomainError>;

    /// Find the binding for a specific (subject, fingerprint) pair
    ///
    /// # Arguments
    /// * `subject_id` - The UUID of the subject
    /// * `device_fingerprint_hash` - The hashed device fingerprint
    ///
    /// # Returns
    /// * `Ok(Some(DeviceBinding))` - Binding found
    /// * `Ok(None)` - No binding for this pair
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_subject_and_fingerprint(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
    ) -> Result<Option<DeviceBinding>, DomainError>;

    /// Insert a new device binding
    ///
    /// # Arguments
    /// * `binding` - The DeviceBinding entity to persist
    ///
    /// # Returns
    /// * `Ok(DeviceBinding)` - The saved binding
    /// * `Err(DomainError)` - Insert failed (e.g. duplicate key race)
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use pv_core::repositories::DeviceBindingRepository;
    /// # use pv_core::domain::entities::device_binding::DeviceBinding;
    /// # async fn example(repo: &impl DeviceBindingRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let binding = DeviceBinding::new(
    ///     Uuid::new_v4(),
    ///     "fingerprint_hash".to_string(),
    ///     "user_agent_hash".to_string(),
    ///     "source_address_hash".to_string(),
    ///     "single_use_id_hash".to_string(),
    /// );
    ///
    /// let saved = repo.insert(binding).await?;
    /// println!("Bound device for subject {}", saved.subject_id);
    /// # Ok(())
    /// # }
    /// ```
    async fn insert(&self, binding: DeviceBinding) -> Result<DeviceBinding, DomainError>;

    /// Update an existing binding with an optimistic version guard
    ///
    /// The update must only apply when the stored version equals
    /// `binding.version`; on success the stored version is incremented.
    ///
    /// # Arguments
    /// * `binding` - The binding carrying updated hashes, `last_used_at`,
    ///   and the version the caller read
    ///
    /// # Returns
    /// * `Ok(DeviceBinding)` - The updated binding with its new version
    /// * `Err(DomainError::Conflict)` - Version mismatch or missing row
    /// * `Err(DomainError)` - Database error occurred
    async fn update(&self, binding: DeviceBinding) -> Result<DeviceBinding, DomainError>;

    /// Check whether a subject has used a given user agent before
    ///
    /// # Arguments
    /// * `subject_id` - The UUID of the subject
    /// * `user_agent_hash` - The hashed user agent
    ///
    /// # Returns
    /// * `Ok(true)` - Some binding for the subject carries this user agent
    /// * `Ok(false)` - User agent unknown for this subject
    /// * `Err(DomainError)` - Database error occurred
    async fn is_known_user_agent(
        &self,
        subject_id: Uuid,
        user_agent_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Check whether a subject has authenticated from a source address before
    ///
    /// # Arguments
    /// * `subject_id` - The UUID of the subject
    /// * `source_address_hash` - The hashed source address
    ///
    /// # Returns
    /// * `Ok(true)` - Some binding for the subject carries this address
    /// * `Ok(false)` - Address unknown for this subject
    /// * `Err(DomainError)` - Database error occurred
    async fn is_known_source_address(
        &self,
        subject_id: Uuid,
        source_address_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Check whether a single-use token id has already been consumed
    ///
    /// # Arguments
    /// * `single_use_id_hash` - The hashed single-use id (jti)
    ///
    /// # Returns
    /// * `Ok(true)` - The id matches a consumed id on some binding (replay)
    /// * `Ok(false)` - The id has not been seen
    /// * `Err(DomainError)` - Database error occurred
    async fn is_replayed_single_use_id(
        &self,
        single_use_id_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Check whether a (subject, fingerprint) binding exists
    ///
    /// # Arguments
    /// * `subject_id` - The UUID of the subject
    /// * `device_fingerprint_hash` - The hashed device fingerprint
    ///
    /// # Returns
    /// * `Ok(true)` - The device is bound to this subject
    /// * `Ok(false)` - No binding for this pair
    /// * `Err(DomainError)` - Database error occurred
    async fn is_known_device(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
    ) -> Result<bool, DomainError> {
        Ok(self
            .find_by_subject_and_fingerprint(subject_id, device_fingerprint_hash)
            .await?
            .is_some())
    }
}
