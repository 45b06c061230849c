//! # Relation store seam.
//!
//! The relation store is a shared, eventually-consistent key/value surface:
//! each side of a relation may only write the fields it owns. The controller
//! reads peer fields as last-known and rewrites its own fields idempotently —
//! never with cross-invocation locks, never reading back what it just wrote.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::{RelationId, RelationRole};

/// Remote store of per-relation data bags.
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Lists the currently established relations.
    async fn relations(&self) -> Result<Vec<(RelationId, RelationRole)>, RemoteError>;

    /// Reads the fields published by the peer side (last known, maybe stale).
    async fn peer_data(&self, id: RelationId) -> Result<BTreeMap<String, String>, RemoteError>;

    /// Reads the fields we last published on this relation.
    async fn local_data(&self, id: RelationId) -> Result<BTreeMap<String, String>, RemoteError>;

    /// Overwrites our owned fields on this relation.
    async fn publish(
        &self,
        id: RelationId,
        fields: BTreeMap<String, String>,
    ) -> Result<(), RemoteError>;
}
