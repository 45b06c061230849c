//! # Ordered mutation application.
//!
//! Executes the diffed mutations in order against the remote APIs. Each
//! mutation runs with bounded retries and backoff; a mutation that still
//! fails aborts the remaining sequence and reports the applied prefix.
//! There is no rollback — reconciliation is designed to be safely re-entered
//! from any partial state, because the next invocation recomputes the diff
//! from whatever the remote system actually looks like.
//!
//! ## Rules
//! - Cancellation is honored between mutations; an in-progress mutation is
//!   either fully applied or not, and needs no cleanup either way.
//! - Every applied mutation is announced via `MutationApplied`; the aborting
//!   one via `MutationFailed`.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::engine::Mutation;
use crate::error::RemoteError;
use crate::events::{Event, EventKind};
use crate::policies::RetryPolicy;
use crate::remote::{with_retries, StorageApi, SupervisorApi};
use crate::subscribers::SubscriberSet;

/// A mutation failed after exhausting its retries.
///
/// Carries the prefix of mutations that were applied before the abort; they
/// stay in place.
#[derive(Debug, Error)]
#[error("mutation '{mutation}' failed: {error}")]
pub struct ApplyError {
    /// Label of the failed mutation.
    pub mutation: &'static str,
    /// The terminal remote error.
    pub error: RemoteError,
    /// Mutations applied before the abort, in order.
    pub applied: Vec<Mutation>,
}

/// Applies the mutations in order; aborts on the first terminal failure.
///
/// Returns the full list on success so the outcome can report exactly what
/// was done.
pub async fn apply(
    mutations: Vec<Mutation>,
    supervisor: &dyn SupervisorApi,
    storage: &dyn StorageApi,
    retry: &RetryPolicy,
    token: &CancellationToken,
    subs: &SubscriberSet,
) -> Result<Vec<Mutation>, ApplyError> {
    let mut applied = Vec::with_capacity(mutations.len());

    for mutation in mutations {
        if token.is_cancelled() {
            return Err(ApplyError {
                mutation: mutation.label(),
                error: RemoteError::Canceled,
                applied,
            });
        }

        let label = mutation.label();
        let result = match &mutation {
            Mutation::MountStorage => {
                with_retries(retry, token, subs, "mount-storage", || storage.mount()).await
            }
            Mutation::PushLicense(license) => {
                with_retries(retry, token, subs, "push-license", || {
                    supervisor.push_file(&license.dest, &license.bytes)
                })
                .await
            }
            Mutation::SetProcessPlan(plan) => {
                with_retries(retry, token, subs, "set-process-plan", || {
                    supervisor.set_plan(plan)
                })
                .await
            }
            Mutation::StartProcess => {
                with_retries(retry, token, subs, "start-process", || supervisor.start()).await
            }
            Mutation::RestartProcess => {
                with_retries(retry, token, subs, "restart-process", || {
                    supervisor.restart()
                })
                .await
            }
        };

        match result {
            Ok(()) => {
                subs.emit(&Event::new(EventKind::MutationApplied).with_mutation(label))
                    .await;
                applied.push(mutation);
            }
            Err(error) => {
                subs.emit(
                    &Event::new(EventKind::MutationFailed)
                        .with_mutation(label)
                        .with_reason(error.as_message()),
                )
                .await;
                return Err(ApplyError {
                    mutation: label,
                    error,
                    applied,
                });
            }
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProcessPlan, ProcessState};
    use crate::policies::{BackoffPolicy, JitterPolicy};
    use crate::remote::{MemoryStorage, MemorySupervisor};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 2,
            call_timeout: Duration::from_millis(200),
            backoff: BackoffPolicy {
                first: Duration::from_millis(1),
                max: Duration::from_millis(2),
                factor: 1.0,
                jitter: JitterPolicy::None,
            },
        }
    }

    fn sample_plan() -> ProcessPlan {
        ProcessPlan {
            service: "store".into(),
            command: "store".into(),
            args: Vec::new(),
            environment: BTreeMap::new(),
            readiness: None,
        }
    }

    #[tokio::test]
    async fn test_applies_in_order_and_mutates_remote() {
        let sup = MemorySupervisor::new();
        let sto = MemoryStorage::new();
        sto.attach("/data", 1 << 30);

        let applied = apply(
            vec![
                Mutation::MountStorage,
                Mutation::SetProcessPlan(sample_plan()),
                Mutation::StartProcess,
            ],
            &sup,
            &sto,
            &fast_retry(),
            &CancellationToken::new(),
            &SubscriberSet::empty(),
        )
        .await
        .unwrap();

        assert_eq!(applied.len(), 3);
        assert!(sto.status_snapshot().mounted);
        assert_eq!(sup.plan_snapshot(), Some(sample_plan()));
        assert_eq!(sup.process_state().await.unwrap(), ProcessState::Running);
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_and_keeps_prefix() {
        let sup = MemorySupervisor::new();
        sup.set_unavailable(true);
        let sto = MemoryStorage::new();
        sto.attach("/data", 1 << 30);

        let err = apply(
            vec![
                Mutation::MountStorage,
                Mutation::SetProcessPlan(sample_plan()),
                Mutation::StartProcess,
            ],
            &sup,
            &sto,
            &fast_retry(),
            &CancellationToken::new(),
            &SubscriberSet::empty(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.mutation, "set-process-plan");
        assert_eq!(err.applied, vec![Mutation::MountStorage]);
        assert!(sto.status_snapshot().mounted, "applied prefix stays in place");
        assert!(sup.plan_snapshot().is_none(), "aborted mutation not applied");
    }

    #[tokio::test]
    async fn test_rejection_surfaces_without_retry_burn() {
        let sup = MemorySupervisor::new();
        let sto = MemoryStorage::new();
        // storage never attached: mount is rejected outright

        let err = apply(
            vec![Mutation::MountStorage],
            &sup,
            &sto,
            &fast_retry(),
            &CancellationToken::new(),
            &SubscriberSet::empty(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.mutation, "mount-storage");
        assert!(!err.error.is_retryable());
        assert!(err.applied.is_empty());
    }
}
