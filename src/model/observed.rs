//! # Observed remote state.
//!
//! [`ObservedState`] aggregates everything the state readers could fetch this
//! invocation: the supervisor's current plan and process state, storage
//! status, relation snapshots, and the license digest on the workload
//! filesystem. Sources that could not be read are listed in
//! [`ObservedState::failures`] — a failing source degrades the result, it
//! never aborts the read of the others.

use std::fmt;

use crate::error::RemoteError;
use crate::model::{ProcessPlan, ProcessState, RelationId, RelationSnapshot, StorageStatus};

/// Which external source a read targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadSource {
    /// Supervisor API (process plan and state).
    Supervisor,
    /// Storage status API.
    Storage,
    /// Relation listing.
    Relations,
    /// Data bags of one specific relation.
    Relation(RelationId),
    /// License file digest on the workload filesystem.
    License,
}

impl ReadSource {
    /// Returns `true` for sources the diff cannot safely run without.
    ///
    /// Diffing against an unknown supervisor or storage state could restart a
    /// healthy workload; relation and license reads only degrade the result.
    #[inline]
    pub fn is_critical(&self) -> bool {
        matches!(self, ReadSource::Supervisor | ReadSource::Storage)
    }

    /// Returns the diagnostics label, e.g. `supervisor` or `relation-3`.
    pub fn label(&self) -> String {
        match self {
            ReadSource::Supervisor => "supervisor".to_string(),
            ReadSource::Storage => "storage".to_string(),
            ReadSource::Relations => "relations".to_string(),
            ReadSource::Relation(id) => format!("relation-{}", id.0),
            ReadSource::License => "license".to_string(),
        }
    }
}

impl fmt::Display for ReadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One sub-read that failed after retries.
#[derive(Clone, Debug)]
pub struct ReadFailure {
    /// The source that could not be read.
    pub source: ReadSource,
    /// The terminal error.
    pub error: RemoteError,
}

/// Everything observed about the remote system this invocation.
///
/// Fetched fresh each invocation; never mutated, only replaced.
#[derive(Clone, Debug)]
pub struct ObservedState {
    /// Supervisor's current process plan, if any.
    pub plan: Option<ProcessPlan>,
    /// Supervisor-reported process state.
    pub process: ProcessState,
    /// Storage status.
    pub storage: StorageStatus,
    /// Established relations with their data bags.
    pub relations: Vec<RelationSnapshot>,
    /// Hex sha256 of the license file on the workload filesystem, if present.
    pub license_digest: Option<String>,
    /// Sub-reads that failed (partial data, not an abort).
    pub failures: Vec<ReadFailure>,
}

impl ObservedState {
    /// Returns the first failed critical source, if any.
    pub fn critical_failure(&self) -> Option<&ReadFailure> {
        self.failures.iter().find(|f| f.source.is_critical())
    }

    /// Returns `true` when any non-critical source failed.
    pub fn is_degraded(&self) -> bool {
        self.failures.iter().any(|f| !f.source.is_critical())
    }

    /// Port implied by the observed plan's environment, when derivable.
    ///
    /// Used as the best-known fallback for publishing after a failed build.
    pub fn implied_port(&self) -> Option<u16> {
        self.plan
            .as_ref()
            .and_then(|p| p.environment.get("SERVICE_PORT"))
            .and_then(|v| v.parse().ok())
    }

    /// API base path implied by the observed plan's environment.
    pub fn implied_base_path(&self) -> Option<String> {
        self.plan
            .as_ref()
            .and_then(|p| p.environment.get("SERVICE_API_BASE_PATH"))
            .cloned()
    }
}
