//! MySQL implementation of the device binding repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::Row;
use uuid::Uuid;

use pv_core::domain::entities::device_binding::DeviceBinding;
use pv_core::errors::DomainError;
use pv_core::repositories::DeviceBindingRepository;

/// Stores device bindings in the `device_bindings` table
///
/// Concurrent updates are resolved with an optimistic version column:
/// each successful update bumps `version`, and a write against a stale
/// version affects zero rows.
#[derive(Clone)]
pub struct MySqlDeviceBindingRepository {
    pool: MySqlPool,
}

impl MySqlDeviceBindingRepository {
    /// Create a new repository backed by the given pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_binding(row: &sqlx::mysql::MySqlRow) -> Result<DeviceBinding, DomainError> {
        let subject_id: String = row.try_get("subject_id").map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to get subject_id: {}", e),
            }
        })?;
        let subject_id = Uuid::parse_str(&subject_id).map_err(|e| DomainError::Internal {
            message: format!("Failed to parse subject_id: {}", e),
        })?;

        let device_fingerprint_hash: String =
            row.try_get("device_fingerprint_hash").map_err(|e| {
                DomainError::Internal {
                    message: format!("Failed to get device_fingerprint_hash: {}", e),
                }
            })?;
        let user_agent_hash: String = row.try_get("user_agent_hash").map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to get user_agent_hash: {}", e),
            }
        })?;
        let source_address_hash: String = row.try_get("source_address_hash").map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to get source_address_hash: {}", e),
            }
        })?;
        let last_single_use_id_hash: String =
            row.try_get("last_single_use_id_hash").map_err(|e| {
                DomainError::Internal {
                    message: format!("Failed to get last_single_use_id_hash: {}", e),
                }
            })?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to get created_at: {}", e),
            }
        })?;
        let last_used_at: DateTime<Utc> = row.try_get("last_used_at").map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to get last_used_at: {}", e),
            }
        })?;
        let version: i64 = row.try_get("version").map_err(|e| DomainError::Internal {
            message: format!("Failed to get version: {}", e),
        })?;

        Ok(DeviceBinding {
            subject_id,
            device_fingerprint_hash,
            user_agent_hash,
            source_address_hash,
            last_single_use_id_hash,
            created_at,
            last_used_at,
            version,
        })
    }

    fn is_duplicate_key(error: &sqlx::Error) -> bool {
        match error {
            sqlx::Error::Database(db) => db
                .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                .map(|e| e.number() == 1062)
                .unwrap_or(false),
            _ => false,
        }
    }

    async fn known(&self, query: &str, subject_id: Uuid, value: &str) -> Result<bool, DomainError> {
        let row = sqlx::query(query)
            .bind(subject_id.to_string())
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to query device bindings: {}", e),
            })?;

        let known: i8 = row.try_get("known").map_err(|e| DomainError::Internal {
            message: format!("Failed to get known: {}", e),
        })?;
        Ok(known == 1)
    }
}

#[async_trait]
impl DeviceBindingRepository for MySqlDeviceBindingRepository {
    async fn find_by_fingerprint(
        &self,
        device_fingerprint_hash: &str,
    ) -> Result<Option<DeviceBinding>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT subject_id, device_fingerprint_hash, user_agent_hash,
                   source_address_hash, last_single_use_id_hash,
                   created_at, last_used_at, version
            FROM device_bindings
            WHERE device_fingerprint_hash = ?
            LIMIT 1
            "#,
        )
        .bind(device_fingerprint_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find device binding: {}", e),
        })?;

        row.as_ref().map(Self::row_to_binding).transpose()
    }

    async fn find_by_subject_and_fingerprint(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
    ) -> Result<Option<DeviceBinding>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT subject_id, device_fingerprint_hash, user_agent_hash,
                   source_address_hash, last_single_use_id_hash,
                   created_at, last_used_at, version
            FROM device_bindings
            WHERE subject_id = ? AND device_fingerprint_hash = ?
            LIMIT 1
            "#,
        )
        .bind(subject_id.to_string())
        .bind(device_fingerprint_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find device binding: {}", e),
        })?;

        row.as_ref().map(Self::row_to_binding).transpose()
    }

    async fn insert(&self, binding: DeviceBinding) -> Result<DeviceBinding, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO device_bindings (
                subject_id, device_fingerprint_hash, user_agent_hash,
                source_address_hash, last_single_use_id_hash,
                created_at, last_used_at, version
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(binding.subject_id.to_string())
        .bind(&binding.device_fingerprint_hash)
        .bind(&binding.user_agent_hash)
        .bind(&binding.source_address_hash)
        .bind(&binding.last_single_use_id_hash)
        .bind(binding.created_at)
        .bind(binding.last_used_at)
        .bind(binding.version)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(binding),
            Err(e) if Self::is_duplicate_key(&e) => Err(DomainError::Conflict {
                resource: "device_binding".to_string(),
            }),
            Err(e) => Err(DomainError::Internal {
                message: format!("Failed to insert device binding: {}", e),
            }),
        }
    }

    async fn update(&self, binding: DeviceBinding) -> Result<DeviceBinding, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE device_bindings
            SET user_agent_hash = ?,
                source_address_hash = ?,
                last_single_use_id_hash = ?,
                last_used_at = ?,
                version = version + 1
            WHERE subject_id = ? AND device_fingerprint_hash = ? AND version = ?
            "#,
        )
        .bind(&binding.user_agent_hash)
        .bind(&binding.source_address_hash)
        .bind(&binding.last_single_use_id_hash)
        .bind(binding.last_used_at)
        .bind(binding.subject_id.to_string())
        .bind(&binding.device_fingerprint_hash)
        .bind(binding.version)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to update device binding: {}", e),
        })?;

        // Stale version or missing row both lose the race
        if result.rows_affected() == 0 {
            return Err(DomainError::Conflict {
                resource: "device_binding".to_string(),
            });
        }

        let mut updated = binding;
        updated.version += 1;
        Ok(updated)
    }

    async fn is_known_device(
        &self,
        subject_id: Uuid,
        device_fingerprint_hash: &str,
    ) -> Result<bool, DomainError> {
        self.known(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM device_bindings
                WHERE subject_id = ? AND device_fingerprint_hash = ?
            ) AS known
            "#,
            subject_id,
            device_fingerprint_hash,
        )
        .await
    }

    async fn is_known_user_agent(
        &self,
        subject_id: Uuid,
        user_agent_hash: &str,
    ) -> Result<bool, DomainError> {
        self.known(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM device_bindings
                WHERE subject_id = ? AND user_agent_hash = ?
            ) AS known
            "#,
            subject_id,
            user_agent_hash,
        )
        .await
    }

    async fn is_known_source_address(
        &self,
        subject_id: Uuid,
        source_address_hash: &str,
    ) -> Result<bool, DomainError> {
        self.known(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM device_bindings
                WHERE subject_id = ? AND source_address_hash = ?
            ) AS known
            "#,
            subject_id,
            source_address_hash,
        )
        .await
    }

    async fn is_replayed_single_use_id(
        &self,
        single_use_id_hash: &str,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM device_bindings
                WHERE last_single_use_id_hash = ?
            ) AS known
            "#,
        )
        .bind(single_use_id_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to query device bindings: {}", e),
        })?;

        let known: i8 = row.try_get("known").map_err(|e| DomainError::Internal {
            message: format!("Failed to get known: {}", e),
        })?;
        Ok(known == 1)
    }
}
