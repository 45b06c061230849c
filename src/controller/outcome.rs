//! # Reconcile outcome.
//!
//! [`ReconcileOutcome`] is the controller's final verdict for one
//! invocation: what happened, the externally visible status, and exactly
//! which remote changes were made. The invocation always terminates with
//! one of these — there is no hanging on external convergence signals.

use crate::engine::Mutation;
use crate::model::{IgnoredRelation, ReadFailure, RelationId};
use crate::status::StatusReport;

/// What one invocation concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Desired and observed state match (possibly after mutations).
    Converged,
    /// Converged, but some non-critical source could not be read.
    ConvergedWithDegradation,
    /// Something failed that the next invocation can fix; retry by re-invoke.
    RetryableFailure,
    /// The declared configuration is invalid; no retry until it changes.
    FatalMisconfiguration,
}

impl Verdict {
    /// Returns a short stable label (kebab-case) for diagnostics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Verdict::Converged => "converged",
            Verdict::ConvergedWithDegradation => "converged-degraded",
            Verdict::RetryableFailure => "retryable-failure",
            Verdict::FatalMisconfiguration => "fatal-misconfiguration",
        }
    }
}

/// Full result of one reconcile invocation.
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// The verdict.
    pub verdict: Verdict,
    /// Externally visible status with its single-line message.
    pub status: StatusReport,
    /// Mutations actually applied, in order.
    pub applied: Vec<Mutation>,
    /// Relations whose records were written this invocation.
    pub published: Vec<RelationId>,
    /// Same-role relations that lost the tie-break.
    pub ignored: Vec<IgnoredRelation>,
    /// Sub-reads that failed (partial data).
    pub degraded: Vec<ReadFailure>,
}

impl ReconcileOutcome {
    /// Returns `true` for both converged verdicts.
    pub fn is_converged(&self) -> bool {
        matches!(
            self.verdict,
            Verdict::Converged | Verdict::ConvergedWithDegradation
        )
    }

    /// Returns the applied mutation labels, in order (for logs and tests).
    pub fn mutation_labels(&self) -> Vec<&'static str> {
        self.applied.iter().map(Mutation::label).collect()
    }
}
