//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [reconcile] trigger=config-changed
//! [read-failed] source=relation-3 reason="unavailable: timed out"
//! [retry] call=set-process-plan attempt=2 delay=200ms
//! [applied] mutation=set-process-plan
//! [published] relation=ingress-requester/1
//! [ignored] relation=ingress-requester/7 reason="superseded by relation 1"
//! [status] active: service active on port 8383
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event descriptions
/// to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ReconcileStarted => {
                if let Some(trigger) = &e.trigger {
                    println!("[reconcile] trigger={trigger}");
                }
            }
            EventKind::ReconcileFinished => {
                if let Some(status) = &e.reason {
                    println!("[status] {status}");
                }
            }
            EventKind::ReadFailed => {
                println!(
                    "[read-failed] source={:?} reason={:?}",
                    e.source, e.reason
                );
            }
            EventKind::OptionsRejected => {
                println!("[options-rejected] reason={:?}", e.reason);
            }
            EventKind::AwaitingStorage => {
                println!("[awaiting-storage]");
            }
            EventKind::RemoteRetryScheduled => {
                println!(
                    "[retry] call={:?} attempt={:?} delay={:?}ms reason={:?}",
                    e.call, e.attempt, e.delay_ms, e.reason
                );
            }
            EventKind::MutationApplied => {
                if let Some(m) = e.mutation {
                    println!("[applied] mutation={m}");
                }
            }
            EventKind::MutationFailed => {
                println!(
                    "[mutation-failed] mutation={:?} reason={:?}",
                    e.mutation, e.reason
                );
            }
            EventKind::RelationPublished => {
                println!("[published] relation={:?}", e.relation);
            }
            EventKind::RelationIgnored => {
                println!(
                    "[ignored] relation={:?} reason={:?}",
                    e.relation, e.reason
                );
            }
            EventKind::RelationPublishFailed => {
                println!(
                    "[publish-failed] relation={:?} reason={:?}",
                    e.relation, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
