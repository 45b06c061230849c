//! # Reconciler: sequences one invocation end to end.
//!
//! The state machine per invocation (never persisted across invocations):
//!
//! ```text
//! Start → Read → Build → Diff&Apply → Publish → Report → End
//! ```
//!
//! Any step's failure jumps straight to Report — except Publish, which always
//! runs with the best currently-known state, and Report itself. Every
//! invocation terminates with a [`StatusReport`]; convergence across retries
//! is the platform's job (it re-invokes on the next event), never achieved by
//! blocking in here.
//!
//! ## Statelessness
//! A [`Reconciler`] is built fresh for each triggering event and dropped
//! afterwards. All decision inputs come from external truth (options map,
//! remote observed state, relation data); nothing learned in one invocation
//! survives into the next.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::builder::{build, BuildOutcome};
use crate::config::{Identity, Options};
use crate::engine::{apply, diff, Mutation};
use crate::error::RemoteError;
use crate::events::{Event, EventKind};
use crate::model::{
    fields, select_primaries, DesiredConfig, IgnoredRelation, ObservedState, ReadSource,
    RelationRole,
};
use crate::policies::RetryPolicy;
use crate::publish::{publish_all, PublishInputs};
use crate::remote::{read_observed, RelationStore, StorageApi, SupervisorApi};
use crate::status::summarize;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::{ReconcileOutcome, Trigger, Verdict};

/// Reconciliation controller for one managed workload instance.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use convisor::{
///     Identity, MemoryRelations, MemoryStorage, MemorySupervisor, Reconciler, Trigger,
/// };
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let supervisor = Arc::new(MemorySupervisor::new());
///     let storage = Arc::new(MemoryStorage::new());
///     storage.attach("/data", 1 << 30);
///     let relations = Arc::new(MemoryRelations::new());
///
///     let reconciler = Reconciler::builder(
///         Identity::new("store", "prod"),
///         supervisor,
///         storage,
///         relations,
///     )
///     .build();
///
///     let outcome = reconciler
///         .handle(Trigger::WorkloadReady, CancellationToken::new())
///         .await;
///     assert!(outcome.is_converged());
/// }
/// ```
pub struct Reconciler {
    identity: Identity,
    options: BTreeMap<String, String>,
    license: Option<Vec<u8>>,
    supervisor: Arc<dyn SupervisorApi>,
    storage: Arc<dyn StorageApi>,
    relations: Arc<dyn RelationStore>,
    retry: RetryPolicy,
    subs: SubscriberSet,
}

/// Where the pipeline stood when it reached the publish step.
struct Step {
    verdict: Verdict,
    primary: String,
    transient: bool,
    desired: Option<DesiredConfig>,
    ignored: Vec<IgnoredRelation>,
    applied: Vec<Mutation>,
}

impl Step {
    fn failed(verdict: Verdict, primary: String, transient: bool) -> Self {
        Self {
            verdict,
            primary,
            transient,
            desired: None,
            ignored: Vec::new(),
            applied: Vec::new(),
        }
    }
}

impl Reconciler {
    /// Starts building a reconciler over the three remote seams.
    pub fn builder(
        identity: Identity,
        supervisor: Arc<dyn SupervisorApi>,
        storage: Arc<dyn StorageApi>,
        relations: Arc<dyn RelationStore>,
    ) -> ReconcilerBuilder {
        ReconcilerBuilder {
            identity,
            supervisor,
            storage,
            relations,
            options: BTreeMap::new(),
            license: None,
            retry: RetryPolicy::default(),
            subscribers: Vec::new(),
        }
    }

    /// Handles one triggering event: runs the full pipeline and reports.
    ///
    /// Never fails — every internal error is converted into the outcome's
    /// status. Cancelling `token` aborts between remote calls; an interrupted
    /// invocation needs no cleanup, the next one recomputes the diff from
    /// whatever state the remote system was left in.
    pub async fn handle(&self, trigger: Trigger, token: CancellationToken) -> ReconcileOutcome {
        self.subs
            .emit(&Event::new(EventKind::ReconcileStarted).with_trigger(trigger.as_label()))
            .await;

        // Read. Option parsing happens first only because the reader needs
        // to know whether a license digest is worth fetching.
        let parsed = Options::from_map(&self.options);
        let license_path = parsed.as_ref().ok().and_then(|o| o.license_path.clone());

        let observed = read_observed(
            self.supervisor.as_ref(),
            self.storage.as_ref(),
            self.relations.as_ref(),
            license_path.as_deref(),
            &self.retry,
            &token,
            &self.subs,
        )
        .await;

        // Build, diff, apply.
        let step = match &parsed {
            Err(e) => {
                self.subs
                    .emit(&Event::new(EventKind::OptionsRejected).with_reason(e.as_message()))
                    .await;
                Step::failed(Verdict::FatalMisconfiguration, e.as_message(), false)
            }
            Ok(options) => match observed.critical_failure() {
                Some(failure) => Step::failed(
                    Verdict::RetryableFailure,
                    format!("waiting for {}", source_noun(failure.source)),
                    true,
                ),
                None => self.converge(options, &observed, &token).await,
            },
        };

        // Publish — always runs, from the best currently-known state.
        let inputs = PublishInputs {
            identity: &self.identity,
            options: parsed.as_ref().ok(),
            desired: step.desired.as_ref(),
            observed: &observed,
        };
        let publish = publish_all(
            &inputs,
            self.relations.as_ref(),
            &self.retry,
            &token,
            &self.subs,
        )
        .await;

        for rel in &step.ignored {
            self.subs
                .emit(
                    &Event::new(EventKind::RelationIgnored)
                        .with_relation(format!("{}/{}", rel.role.as_str(), rel.id.0))
                        .with_reason(rel.reason.clone()),
                )
                .await;
        }

        // Report.
        let mut verdict = step.verdict;
        let mut primary = step.primary;
        let mut transient = step.transient;

        if verdict == Verdict::Converged && observed.is_degraded() {
            verdict = Verdict::ConvergedWithDegradation;
        }
        if matches!(
            verdict,
            Verdict::Converged | Verdict::ConvergedWithDegradation
        ) && !publish.failed.is_empty()
        {
            verdict = Verdict::RetryableFailure;
            transient = publish.failed.iter().all(|(_, e)| e.is_retryable());
            primary = format!("could not publish to {} relation(s)", publish.failed.len());
        }

        let status = summarize(verdict, primary, transient, &observed.failures, &step.ignored);

        self.subs
            .emit(&Event::new(EventKind::ReconcileFinished).with_reason(status.to_string()))
            .await;

        ReconcileOutcome {
            verdict,
            status,
            applied: step.applied,
            published: publish.published,
            ignored: step.ignored,
            degraded: observed.failures,
        }
    }

    /// Build + diff + apply for an invocation whose reads were good enough.
    async fn converge(
        &self,
        options: &Options,
        observed: &ObservedState,
        token: &CancellationToken,
    ) -> Step {
        match build(options, &self.identity, observed, self.license.as_deref()) {
            Err(e) => {
                self.subs
                    .emit(&Event::new(EventKind::OptionsRejected).with_reason(e.as_message()))
                    .await;
                Step::failed(Verdict::FatalMisconfiguration, e.as_message(), false)
            }
            Ok(BuildOutcome::AwaitingStorage) => {
                self.subs.emit(&Event::new(EventKind::AwaitingStorage)).await;
                Step::failed(
                    Verdict::RetryableFailure,
                    "storage not attached".to_string(),
                    true,
                )
            }
            Ok(BuildOutcome::Ready { desired, ignored }) => {
                let mutations = diff(&desired, observed);
                match apply(
                    mutations,
                    self.supervisor.as_ref(),
                    self.storage.as_ref(),
                    &self.retry,
                    token,
                    &self.subs,
                )
                .await
                {
                    Ok(applied) => Step {
                        verdict: Verdict::Converged,
                        primary: active_message(&desired, observed),
                        transient: false,
                        desired: Some(desired),
                        ignored,
                        applied,
                    },
                    Err(err) => {
                        let transient = !matches!(&err.error, RemoteError::Rejected { .. });
                        Step {
                            verdict: Verdict::RetryableFailure,
                            primary: format!("could not apply {}", err.mutation),
                            transient,
                            desired: Some(desired),
                            ignored,
                            applied: err.applied,
                        }
                    }
                }
            }
        }
    }
}

/// Human noun for a critical read source, used in `Waiting` messages.
fn source_noun(source: ReadSource) -> &'static str {
    match source {
        ReadSource::Supervisor => "workload supervisor",
        ReadSource::Storage => "storage status",
        // Non-critical sources never reach the waiting path.
        _ => "remote state",
    }
}

/// Primary message for a converged invocation.
fn active_message(desired: &DesiredConfig, observed: &ObservedState) -> String {
    let (primaries, _) = select_primaries(&observed.relations);
    let external = primaries
        .get(&RelationRole::IngressRequester)
        .and_then(|id| observed.relations.iter().find(|r| r.id == *id))
        .and_then(|r| r.peer.get(fields::EXTERNAL_URL));

    match external {
        Some(url) => format!("serving at {url}"),
        None => format!("service active on port {}", desired.port),
    }
}

/// Builder for constructing a [`Reconciler`] with optional inputs.
pub struct ReconcilerBuilder {
    identity: Identity,
    supervisor: Arc<dyn SupervisorApi>,
    storage: Arc<dyn StorageApi>,
    relations: Arc<dyn RelationStore>,
    options: BTreeMap<String, String>,
    license: Option<Vec<u8>>,
    retry: RetryPolicy,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ReconcilerBuilder {
    /// Sets the declared options (the platform's flat string map).
    pub fn with_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.options = options;
        self
    }

    /// Attaches the raw license artifact, when the platform provides one.
    pub fn with_license(mut self, license: Vec<u8>) -> Self {
        self.license = Some(license);
        self
    }

    /// Overrides the retry discipline for remote calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets diagnostic event subscribers.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the reconciler for one invocation.
    pub fn build(self) -> Reconciler {
        Reconciler {
            identity: self.identity,
            options: self.options,
            license: self.license,
            supervisor: self.supervisor,
            storage: self.storage,
            relations: self.relations,
            retry: self.retry,
            subs: SubscriberSet::new(self.subscribers),
        }
    }
}
