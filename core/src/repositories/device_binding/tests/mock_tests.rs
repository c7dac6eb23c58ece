//! Unit tests for mock device binding repository implementation

use uuid::Uuid;

use crate::domain::entities::device_binding::DeviceBinding;
use crate::errors::DomainError;
use crate::repositories::device_binding::{DeviceBindingRepository, MockDeviceBindingRepository};

fn binding_for(subject_id: Uuid, fingerprint: &str) -> DeviceBinding {
    DeviceBinding::new(
        subject_id,
        fingerprint.to_string(),
        "ua-hash".to_string(),
        "addr-hash".to_string(),
        "jti-hash".to_string(),
    )
}

#[tokio::test]
async fn test_insert_and_find_binding() {
    let repo = MockDeviceBindingRepository::new();
    let subject_id = Uuid::new_v4();

    let binding = binding_for(subject_id, "fp-1");
    let saved = repo.insert(binding.clone()).await.unwrap();
    assert_eq!(saved.subject_id, subject_id);

    // Find by composite identity
    let found = repo
        .find_by_subject_and_fingerprint(subject_id, "fp-1")
        .await
        .unwrap();
    assert_eq!(found, Some(binding.clone()));

    // Find by fingerprint alone, regardless of subject
    let found = repo.find_by_fingerprint("fp-1").await.unwrap();
    assert_eq!(found, Some(binding));

    assert!(repo.is_known_device(subject_id, "fp-1").await.unwrap());
    assert!(!repo.is_known_device(subject_id, "fp-2").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_insert_conflicts() {
    let repo = MockDeviceBindingRepository::new();
    let subject_id = Uuid::new_v4();

    repo.insert(binding_for(subject_id, "fp-1")).await.unwrap();

    let result = repo.insert(binding_for(subject_id, "fp-1")).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_update_bumps_version() {
    let repo = MockDeviceBindingRepository::new();
    let subject_id = Uuid::new_v4();

    let mut binding = repo.insert(binding_for(subject_id, "fp-1")).await.unwrap();
    binding.record_use(
        "ua-hash-2".to_string(),
        "addr-hash-2".to_string(),
        "jti-hash-2".to_string(),
    );

    let updated = repo.update(binding).await.unwrap();
    assert_eq!(updated.version, 1);
    assert_eq!(updated.user_agent_hash, "ua-hash-2");
}

#[tokio::test]
async fn test_stale_version_update_conflicts() {
    let repo = MockDeviceBindingRepository::new();
    let subject_id = Uuid::new_v4();

    let binding = repo.insert(binding_for(subject_id, "fp-1")).await.unwrap();

    // First writer wins
    repo.update(binding.clone()).await.unwrap();

    // Second writer still holds version 0
    let result = repo.update(binding).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));
}

#[tokio::test]
async fn test_update_missing_binding_conflicts() {
    let repo = MockDeviceBindingRepository::new();

    let result = repo.update(binding_for(Uuid::new_v4(), "fp-1")).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));
}

#[tokio::test]
async fn test_corroboration_lookups() {
    let repo = MockDeviceBindingRepository::new();
    let subject_id = Uuid::new_v4();
    let other_subject = Uuid::new_v4();

    repo.insert(binding_for(subject_id, "fp-1")).await.unwrap();

    assert!(repo
        .is_known_user_agent(subject_id, "ua-hash")
        .await
        .unwrap());
    assert!(!repo
        .is_known_user_agent(other_subject, "ua-hash")
        .await
        .unwrap());

    assert!(repo
        .is_known_source_address(subject_id, "addr-hash")
        .await
        .unwrap());
    assert!(!repo
        .is_known_source_address(subject_id, "other-addr")
        .await
        .unwrap());

    assert!(repo.is_replayed_single_use_id("jti-hash").await.unwrap());
    assert!(!repo.is_replayed_single_use_id("fresh-jti").await.unwrap());
}
