//! # Triggering events.
//!
//! The platform re-invokes the controller on every external occurrence:
//! config changes, relation churn, storage attachment, timers. All of them
//! dispatch through the single [`Reconciler::handle`](crate::Reconciler::handle)
//! entry point, and every one of them runs the full reconcile — the trigger
//! kind only flavors diagnostics. Skipping stages per trigger would be an
//! optimization, never a correctness requirement, so it is not done here.

use crate::model::RelationRole;

/// External occurrence that caused this invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The supervisor reported the workload container ready.
    WorkloadReady,
    /// Declared options changed.
    ConfigChanged,
    /// The platform attached durable storage.
    StorageAttached,
    /// The platform is about to detach durable storage.
    StorageDetaching,
    /// A relation of the given role was established.
    RelationJoined(RelationRole),
    /// A relation of the given role went away.
    RelationDeparted(RelationRole),
    /// The workload is being upgraded.
    UpgradeRequested,
    /// Periodic status refresh.
    Tick,
}

impl Trigger {
    /// Returns the stable kebab-case label for diagnostics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Trigger::WorkloadReady => "workload-ready",
            Trigger::ConfigChanged => "config-changed",
            Trigger::StorageAttached => "storage-attached",
            Trigger::StorageDetaching => "storage-detaching",
            Trigger::RelationJoined(_) => "relation-joined",
            Trigger::RelationDeparted(_) => "relation-departed",
            Trigger::UpgradeRequested => "upgrade-requested",
            Trigger::Tick => "tick",
        }
    }

    /// Returns the relation role carried by relation triggers.
    pub fn relation_role(&self) -> Option<RelationRole> {
        match self {
            Trigger::RelationJoined(role) | Trigger::RelationDeparted(role) => Some(*role),
            _ => None,
        }
    }
}
