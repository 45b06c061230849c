//! # Aggregate state reader.
//!
//! [`read_observed`] pulls every observed fact the pipeline needs: the
//! supervisor's plan and process state, storage status, the license digest,
//! and all relation data bags. Each sub-read is independently retried; a
//! failing source is recorded in [`ObservedState::failures`] and **never**
//! prevents the others from being reported.
//!
//! ## Rules
//! - Reads run in a fixed order (supervisor, storage, license, relations) so
//!   two invocations against identical remotes observe identical state.
//! - A failed supervisor read skips the rest of that source — one outage is
//!   one failure entry, not three.
//! - No read mutates anything.

use tokio_util::sync::CancellationToken;

use crate::events::{Event, EventKind};
use crate::model::{
    ObservedState, ProcessState, ReadFailure, ReadSource, RelationSnapshot, StorageStatus,
};
use crate::policies::RetryPolicy;
use crate::remote::{with_retries, RelationStore, StorageApi, SupervisorApi};
use crate::subscribers::SubscriberSet;

/// Reads the complete observed state, tolerating partial failures.
#[allow(clippy::too_many_arguments)]
pub async fn read_observed(
    supervisor: &dyn SupervisorApi,
    storage: &dyn StorageApi,
    relations: &dyn RelationStore,
    license_path: Option<&str>,
    retry: &RetryPolicy,
    token: &CancellationToken,
    subs: &SubscriberSet,
) -> ObservedState {
    let mut failures: Vec<ReadFailure> = Vec::new();

    // Supervisor: plan, then process state. One outage, one failure entry.
    let mut plan = None;
    let mut process = ProcessState::NotStarted;
    match with_retries(retry, token, subs, "read-plan", || supervisor.plan()).await {
        Ok(p) => {
            plan = p;
            match with_retries(retry, token, subs, "read-process-state", || {
                supervisor.process_state()
            })
            .await
            {
                Ok(state) => process = state,
                Err(e) => record(&mut failures, subs, ReadSource::Supervisor, e).await,
            }
        }
        Err(e) => record(&mut failures, subs, ReadSource::Supervisor, e).await,
    }

    // Storage status.
    let storage_status = match with_retries(retry, token, subs, "read-storage", || {
        storage.status()
    })
    .await
    {
        Ok(status) => status,
        Err(e) => {
            record(&mut failures, subs, ReadSource::Storage, e).await;
            StorageStatus::detached()
        }
    };

    // License digest, only when licensing is configured.
    let mut license_digest = None;
    if let Some(path) = license_path {
        match with_retries(retry, token, subs, "read-license-digest", || {
            supervisor.file_digest(path)
        })
        .await
        {
            Ok(digest) => license_digest = digest,
            Err(e) => record(&mut failures, subs, ReadSource::License, e).await,
        }
    }

    // Relations: listing, then both data bags per relation, in id order.
    let mut snapshots = Vec::new();
    match with_retries(retry, token, subs, "read-relations", || {
        relations.relations()
    })
    .await
    {
        Ok(mut listed) => {
            listed.sort_by_key(|(id, _)| *id);
            for (id, role) in listed {
                let mut snapshot = RelationSnapshot {
                    id,
                    role,
                    peer: Default::default(),
                    local: Default::default(),
                };
                match with_retries(retry, token, subs, "read-peer-data", || {
                    relations.peer_data(id)
                })
                .await
                {
                    Ok(peer) => {
                        snapshot.peer = peer;
                        match with_retries(retry, token, subs, "read-local-data", || {
                            relations.local_data(id)
                        })
                        .await
                        {
                            Ok(local) => snapshot.local = local,
                            Err(e) => {
                                record(&mut failures, subs, ReadSource::Relation(id), e).await
                            }
                        }
                    }
                    Err(e) => record(&mut failures, subs, ReadSource::Relation(id), e).await,
                }
                snapshots.push(snapshot);
            }
        }
        Err(e) => record(&mut failures, subs, ReadSource::Relations, e).await,
    }

    ObservedState {
        plan,
        process,
        storage: storage_status,
        relations: snapshots,
        license_digest,
        failures,
    }
}

/// Records one failed sub-read and announces it.
async fn record(
    failures: &mut Vec<ReadFailure>,
    subs: &SubscriberSet,
    source: ReadSource,
    error: crate::error::RemoteError,
) {
    subs.emit(
        &Event::new(EventKind::ReadFailed)
            .with_source(source.label())
            .with_reason(error.as_message()),
    )
    .await;
    failures.push(ReadFailure { source, error });
}
