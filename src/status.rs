//! Status reporter: the single externally visible line per invocation.
//!
//! [`StatusReport`] is the controller's whole outward surface: one of four
//! states with a single-line message naming the unmet precondition. Internal
//! error detail (stacks, retry counts, per-call failures) stays on the
//! diagnostics channel and never leaks into the primary message.

use std::fmt;

use serde::Serialize;

use crate::controller::Verdict;
use crate::model::{IgnoredRelation, ReadFailure};

/// Externally visible workload status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StatusReport {
    /// The workload is converged and serving.
    Active(String),
    /// A precondition is not met yet; the platform will re-invoke us.
    Waiting(String),
    /// The declared configuration is invalid; no retry until it changes.
    Blocked(String),
    /// A mutation was refused by the remote system; retried on the next event.
    Error(String),
}

impl StatusReport {
    /// Returns the status label (`active`, `waiting`, `blocked`, `error`).
    pub fn as_label(&self) -> &'static str {
        match self {
            StatusReport::Active(_) => "active",
            StatusReport::Waiting(_) => "waiting",
            StatusReport::Blocked(_) => "blocked",
            StatusReport::Error(_) => "error",
        }
    }

    /// Returns the single-line message.
    pub fn message(&self) -> &str {
        match self {
            StatusReport::Active(m)
            | StatusReport::Waiting(m)
            | StatusReport::Blocked(m)
            | StatusReport::Error(m) => m,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.as_label(), self.message())
    }
}

/// Maps the final verdict and context into the externally visible status.
///
/// `transient` distinguishes a retryable failure that should read as
/// `Waiting` (remote temporarily unreachable) from one that should read as
/// `Error` (a mutation was refused). Degraded sources and tie-break losers
/// are appended to `Active` messages so they are visible without digging
/// into diagnostics.
pub fn summarize(
    verdict: Verdict,
    primary: impl Into<String>,
    transient: bool,
    degraded: &[ReadFailure],
    ignored: &[IgnoredRelation],
) -> StatusReport {
    let primary = primary.into();
    match verdict {
        Verdict::Converged => StatusReport::Active(with_ignored(primary, ignored)),
        Verdict::ConvergedWithDegradation => {
            let sources: Vec<String> = degraded
                .iter()
                .filter(|f| !f.source.is_critical())
                .map(|f| f.source.label())
                .collect();
            let msg = if sources.is_empty() {
                primary
            } else {
                format!("{primary}; degraded: {}", sources.join(", "))
            };
            StatusReport::Active(with_ignored(msg, ignored))
        }
        Verdict::RetryableFailure => {
            if transient {
                StatusReport::Waiting(primary)
            } else {
                StatusReport::Error(primary)
            }
        }
        Verdict::FatalMisconfiguration => StatusReport::Blocked(primary),
    }
}

fn with_ignored(primary: String, ignored: &[IgnoredRelation]) -> String {
    if ignored.is_empty() {
        return primary;
    }
    let list: Vec<String> = ignored
        .iter()
        .map(|r| format!("{}/{}", r.role.as_str(), r.id.0))
        .collect();
    format!("{primary}; ignored: {}", list.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::model::{ReadSource, RelationId, RelationRole};

    #[test]
    fn test_converged_maps_to_active() {
        let report = summarize(
            Verdict::Converged,
            "service active on port 8383",
            false,
            &[],
            &[],
        );
        assert_eq!(
            report,
            StatusReport::Active("service active on port 8383".into())
        );
        assert_eq!(report.to_string(), "active: service active on port 8383");
    }

    #[test]
    fn test_degradation_names_sources() {
        let degraded = vec![ReadFailure {
            source: ReadSource::Relation(RelationId(3)),
            error: RemoteError::Unavailable {
                error: "down".into(),
            },
        }];
        let report = summarize(
            Verdict::ConvergedWithDegradation,
            "service active on port 8383",
            false,
            &degraded,
            &[],
        );
        assert_eq!(
            report.message(),
            "service active on port 8383; degraded: relation-3"
        );
    }

    #[test]
    fn test_retryable_splits_on_transience() {
        let waiting = summarize(Verdict::RetryableFailure, "storage not attached", true, &[], &[]);
        assert_eq!(waiting.as_label(), "waiting");

        let error = summarize(
            Verdict::RetryableFailure,
            "could not apply set-process-plan",
            false,
            &[],
            &[],
        );
        assert_eq!(error.as_label(), "error");
    }

    #[test]
    fn test_blocked_carries_validation_message() {
        let report = summarize(
            Verdict::FatalMisconfiguration,
            "invalid log level: 'loud'",
            false,
            &[],
            &[],
        );
        assert_eq!(report, StatusReport::Blocked("invalid log level: 'loud'".into()));
    }

    #[test]
    fn test_ignored_relations_are_reported() {
        let ignored = vec![IgnoredRelation {
            id: RelationId(7),
            role: RelationRole::IngressRequester,
            reason: "superseded by relation 1".into(),
        }];
        let report = summarize(Verdict::Converged, "service active", false, &[], &ignored);
        assert_eq!(
            report.message(),
            "service active; ignored: ingress-requester/7"
        );
    }
}
