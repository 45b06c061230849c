//! Relation publishers: what we tell each connected peer.
//!
//! Record builders are pure functions from best-known state to the owned
//! fields of one relation role; the actual writes happen in [`publish_all`].
//!
//! ## Rules
//! - Publishing always runs, even when an earlier pipeline step failed — a
//!   peer must never hold stale endpoint data longer than necessary. The
//!   record builders fall back from the built desired config to values
//!   implied by the observed plan, and only skip a relation when nothing at
//!   all is known.
//! - Only owned fields are written, wholesale and idempotently: a record
//!   equal to what the relation already holds is not rewritten.
//! - Nothing is read back after a write within the same invocation.

mod bucket;
mod ingress;
mod observability;

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;

use crate::config::{Identity, Options};
use crate::error::RemoteError;
use crate::events::{Event, EventKind};
use crate::model::{
    fields, select_primaries, DesiredConfig, ObservedState, RelationId, RelationRole,
};
use crate::policies::RetryPolicy;
use crate::remote::{with_retries, RelationStore};
use crate::subscribers::SubscriberSet;

/// Best currently-known state the record builders draw from.
///
/// `options` and `desired` are `None` when the corresponding pipeline step
/// failed this invocation; the accessors then fall back to values implied by
/// the observed plan.
#[derive(Clone, Copy)]
pub struct PublishInputs<'a> {
    /// Workload naming context.
    pub identity: &'a Identity,
    /// Parsed options, when validation succeeded.
    pub options: Option<&'a Options>,
    /// Built desired config, when the build step succeeded.
    pub desired: Option<&'a DesiredConfig>,
    /// Observed remote state (always available, possibly degraded).
    pub observed: &'a ObservedState,
}

impl<'a> PublishInputs<'a> {
    /// Best-known listening port.
    fn port(&self) -> Option<u16> {
        self.desired
            .map(|d| d.port)
            .or(self.options.map(|o| o.port))
            .or_else(|| self.observed.implied_port())
    }

    /// Best-known API base path.
    fn base_path(&self) -> Option<String> {
        self.options
            .map(|o| o.base_path(self.identity))
            .or_else(|| self.observed.implied_base_path())
    }

    /// Best-known data directory.
    fn data_path(&self) -> Option<String> {
        self.desired
            .map(|d| d.data_path.clone())
            .or_else(|| self.options.map(|o| o.data_path.clone()))
    }

    /// URL scheme for endpoints we advertise.
    fn scheme(&self) -> &'static str {
        if self.options.map(|o| o.tls).unwrap_or(false) {
            "https"
        } else {
            "http"
        }
    }

    /// External URL published by the honored ingress relation, if any.
    fn external_url(&self) -> Option<String> {
        let (primaries, _) = select_primaries(&self.observed.relations);
        let id = primaries.get(&RelationRole::IngressRequester)?;
        self.observed
            .relations
            .iter()
            .find(|r| r.id == *id)
            .and_then(|r| r.peer.get(fields::EXTERNAL_URL))
            .cloned()
    }
}

/// Outcome of the publish stage.
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Relations whose records were written this invocation.
    pub published: Vec<RelationId>,
    /// Relations whose writes failed after retries.
    pub failed: Vec<(RelationId, RemoteError)>,
}

/// Builds the owned-field record for one relation role.
///
/// Returns `None` when not enough is known to publish anything useful.
pub fn record_for(role: RelationRole, inputs: &PublishInputs<'_>) -> Option<BTreeMap<String, String>> {
    match role {
        RelationRole::IngressRequester => ingress::record(inputs),
        RelationRole::BucketConsumer => bucket::record(inputs),
        RelationRole::ObservabilityRegistrant => observability::record(inputs),
    }
}

/// Publishes records to every established relation.
///
/// Attempts every relation even when some fail; an unchanged record is
/// skipped without a write.
pub async fn publish_all(
    inputs: &PublishInputs<'_>,
    store: &dyn RelationStore,
    retry: &RetryPolicy,
    token: &CancellationToken,
    subs: &SubscriberSet,
) -> PublishReport {
    let mut report = PublishReport::default();

    for relation in &inputs.observed.relations {
        let Some(record) = record_for(relation.role, inputs) else {
            subs.emit(
                &Event::new(EventKind::RelationIgnored)
                    .with_relation(relation.label())
                    .with_reason("nothing known to publish"),
            )
            .await;
            continue;
        };

        if record == relation.local {
            continue; // already current, a rewrite would be pure churn
        }

        let result = with_retries(retry, token, subs, "publish-relation", || {
            store.publish(relation.id, record.clone())
        })
        .await;

        match result {
            Ok(()) => {
                subs.emit(
                    &Event::new(EventKind::RelationPublished).with_relation(relation.label()),
                )
                .await;
                report.published.push(relation.id);
            }
            Err(error) => {
                subs.emit(
                    &Event::new(EventKind::RelationPublishFailed)
                        .with_relation(relation.label())
                        .with_reason(error.as_message()),
                )
                .await;
                report.failed.push((relation.id, error));
            }
        }
    }

    report
}
