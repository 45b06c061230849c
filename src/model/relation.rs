//! # Relation data types.
//!
//! A relation is a typed, bidirectional data-exchange channel to one peer
//! service. Each side owns only the fields it publishes; the peer's fields
//! are always read as *last known, possibly stale*.
//!
//! ## Ownership rules
//! - Local fields: overwritten wholesale by our publishers, idempotently.
//! - Peer fields: read-only, never assumed fresh, never written.
//!
//! ## Tie-breaks
//! When several relations share a role, the one with the smallest stable
//! [`RelationId`] is honored for reads; the others are reported as ignored
//! (never silently merged). See [`select_primaries`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Well-known field names exchanged over relations.
pub mod fields {
    /// Published to ingress requesters: our service name.
    pub const SERVICE_NAME: &str = "service-name";
    /// Published to ingress requesters: our listening port.
    pub const PORT: &str = "port";
    /// Published to ingress requesters: whether the proxy should strip the prefix.
    pub const STRIP_PREFIX: &str = "strip-prefix";
    /// Read from ingress requesters: the externally reachable URL.
    pub const EXTERNAL_URL: &str = "external-url";

    /// Published to bucket providers: the bucket we want created.
    pub const REQUESTED_BUCKET_NAME: &str = "requested-bucket-name";
    /// Read from bucket providers: the object-store endpoint.
    pub const ENDPOINT: &str = "endpoint";
    /// Read from bucket providers: reference to the credentials secret.
    pub const CREDENTIALS_SECRET_REF: &str = "credentials-secret-ref";

    /// Published to observability registrants: metrics scrape endpoint.
    pub const METRICS_ENDPOINT: &str = "metrics-endpoint";
    /// Published to observability registrants: scrape port.
    pub const SCRAPE_PORT: &str = "scrape-port";
    /// Published to observability registrants: dashboard JSON document.
    pub const DASHBOARD_DEFINITION: &str = "dashboard-definition";
    /// Published to observability registrants: workload log file path.
    pub const LOG_PATH: &str = "log-path";
}

/// Stable, orderable identifier of one established relation.
///
/// Ordering on this identifier is the tie-break for conflicting same-role
/// relations: smallest wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RelationId(pub u64);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relation {}", self.0)
    }
}

/// Role of the connected peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RelationRole {
    /// Peer that routes external traffic to us; reads our service/port.
    IngressRequester,
    /// Peer that provisions an object-store bucket for us.
    BucketConsumer,
    /// Peer that scrapes metrics and renders our dashboard.
    ObservabilityRegistrant,
}

impl RelationRole {
    /// Returns the stable kebab-case role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationRole::IngressRequester => "ingress-requester",
            RelationRole::BucketConsumer => "storage-bucket-consumer",
            RelationRole::ObservabilityRegistrant => "observability-registrant",
        }
    }
}

impl fmt::Display for RelationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One established relation as observed this invocation.
///
/// `peer` holds the fields published by the other side (stale-tolerant);
/// `local` holds what we last published (used to skip no-op rewrites).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationSnapshot {
    /// Stable relation identifier.
    pub id: RelationId,
    /// Peer role.
    pub role: RelationRole,
    /// Fields owned and published by the peer.
    pub peer: BTreeMap<String, String>,
    /// Fields owned and published by us (last known).
    pub local: BTreeMap<String, String>,
}

impl RelationSnapshot {
    /// Returns the diagnostics label, e.g. `ingress-requester/3`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.role.as_str(), self.id.0)
    }
}

/// A same-role relation that lost the tie-break.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IgnoredRelation {
    /// Stable relation identifier.
    pub id: RelationId,
    /// Peer role.
    pub role: RelationRole,
    /// Single-line reason, names the honored relation.
    pub reason: String,
}

/// Selects the honored relation per role (smallest [`RelationId`] wins).
///
/// Returns the winners keyed by role plus the losers as [`IgnoredRelation`]s.
/// The input order does not matter; the result is fully determined by the
/// stable identifiers.
pub fn select_primaries(
    relations: &[RelationSnapshot],
) -> (BTreeMap<RelationRole, RelationId>, Vec<IgnoredRelation>) {
    let mut primaries: BTreeMap<RelationRole, RelationId> = BTreeMap::new();
    for rel in relations {
        let entry = primaries.entry(rel.role).or_insert(rel.id);
        if rel.id < *entry {
            *entry = rel.id;
        }
    }

    let mut ignored = Vec::new();
    for rel in relations {
        let winner = primaries[&rel.role];
        if rel.id != winner {
            ignored.push(IgnoredRelation {
                id: rel.id,
                role: rel.role,
                reason: format!("superseded by {winner}"),
            });
        }
    }
    ignored.sort_by_key(|r| r.id);

    (primaries, ignored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: u64, role: RelationRole) -> RelationSnapshot {
        RelationSnapshot {
            id: RelationId(id),
            role,
            peer: BTreeMap::new(),
            local: BTreeMap::new(),
        }
    }

    #[test]
    fn test_smallest_id_wins() {
        let rels = vec![
            snap(7, RelationRole::IngressRequester),
            snap(3, RelationRole::IngressRequester),
        ];
        let (primaries, ignored) = select_primaries(&rels);
        assert_eq!(primaries[&RelationRole::IngressRequester], RelationId(3));
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].id, RelationId(7));
        assert_eq!(ignored[0].reason, "superseded by relation 3");
    }

    #[test]
    fn test_result_is_order_independent() {
        let forward = vec![
            snap(3, RelationRole::IngressRequester),
            snap(7, RelationRole::IngressRequester),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(select_primaries(&forward), select_primaries(&reversed));
    }

    #[test]
    fn test_distinct_roles_never_conflict() {
        let rels = vec![
            snap(5, RelationRole::IngressRequester),
            snap(6, RelationRole::ObservabilityRegistrant),
        ];
        let (primaries, ignored) = select_primaries(&rels);
        assert_eq!(primaries.len(), 2);
        assert!(ignored.is_empty());
    }
}
