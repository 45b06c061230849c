//! # Storage facts reported by the platform.
//!
//! [`StorageStatus`] distinguishes *attached* (the platform has bound durable
//! storage to this workload) from *mounted* (the storage is available at its
//! path inside the workload container). Attachment is a platform decision the
//! controller can only wait for; mounting is a mutation it applies.

use serde::Serialize;

/// Observed status of the workload's durable storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorageStatus {
    /// The platform has attached durable storage to this workload.
    pub attached: bool,
    /// The storage is mounted into the workload container.
    pub mounted: bool,
    /// Mount path inside the container, when known.
    pub path: Option<String>,
    /// Capacity in bytes, when known.
    pub capacity_bytes: Option<u64>,
}

impl StorageStatus {
    /// Status for a workload with no storage attached yet.
    pub fn detached() -> Self {
        Self {
            attached: false,
            mounted: false,
            path: None,
            capacity_bytes: None,
        }
    }

    /// Status for attached-but-unmounted storage.
    pub fn attached(path: impl Into<String>, capacity_bytes: u64) -> Self {
        Self {
            attached: true,
            mounted: false,
            path: Some(path.into()),
            capacity_bytes: Some(capacity_bytes),
        }
    }
}
