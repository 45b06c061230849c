//! # Storage API seam.
//!
//! Attachment of durable storage is a platform decision; the controller can
//! only observe it and, once attached, request the mount.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::StorageStatus;

/// Remote API over the workload's durable storage.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Returns the current storage status.
    async fn status(&self) -> Result<StorageStatus, RemoteError>;

    /// Mounts the attached storage into the workload (no-op when mounted).
    ///
    /// Rejected when no storage is attached.
    async fn mount(&self) -> Result<(), RemoteError>;
}
