//! Device binding entity tying a fingerprinted device to one account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted association between a subject and a device fingerprint
///
/// Identity is the composite `(subject_id, device_fingerprint_hash)`. A given
/// fingerprint is bound to exactly one subject at a time; attempts to rebind
/// it under a different subject are rejected by the binding service. Bindings
/// are created on first successful authentication from a device and updated
/// on every subsequent one; they are never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBinding {
    /// Subject (user ID) this device is bound to
    pub subject_id: Uuid,

    /// Hash of the device fingerprint
    pub device_fingerprint_hash: String,

    /// Hash of the user agent seen on the most recent authentication
    pub user_agent_hash: String,

    /// Hash of the source address seen on the most recent authentication
    pub source_address_hash: String,

    /// Hash of the most recently consumed single-use token id (jti)
    ///
    /// Updated when a single-use id is spent (initial session seed at first
    /// login, consumed refresh token on rotation). Token validation treats a
    /// presented jti equal to this value as a replay.
    pub last_single_use_id_hash: String,

    /// Timestamp when the binding was first created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent successful authentication
    pub last_used_at: DateTime<Utc>,

    /// Optimistic concurrency version, bumped by the storage layer on update
    pub version: i64,
}

impl DeviceBinding {
    /// Creates a new binding for a (subject, device) pair
    pub fn new(
        subject_id: Uuid,
        device_fingerprint_hash: String,
        user_agent_hash: String,
        source_address_hash: String,
        last_single_use_id_hash: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            subject_id,
            device_fingerprint_hash,
            user_agent_hash,
            source_address_hash,
            last_single_use_id_hash,
            created_at: now,
            last_used_at: now,
            version: 0,
        }
    }

    /// Records a successful authentication from this device
    ///
    /// Refreshes the per-use hashes and the `last_used_at` timestamp. The
    /// optimistic version is left alone; the storage layer bumps it when the
    /// update is persisted.
    pub fn record_use(
        &mut self,
        user_agent_hash: String,
        source_address_hash: String,
        last_single_use_id_hash: String,
    ) {
        self.user_agent_hash = user_agent_hash;
        self.source_address_hash = source_address_hash;
        self.last_single_use_id_hash = last_single_use_id_hash;
        self.last_used_at = Utc::now();
    }
}
