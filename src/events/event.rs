//! # Diagnostic events emitted during one reconcile invocation.
//!
//! The [`EventKind`] enum classifies event types across the pipeline stages:
//! - **Lifecycle events**: invocation start and finish
//! - **Read events**: per-source read failures and degradations
//! - **Apply events**: mutations applied, retried, failed
//! - **Publish events**: relation records written, ignored, or failed
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! triggering event, mutation labels, relation identifiers, and retry delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! recorded out of band.
//!
//! ## Example
//! ```rust
//! use convisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::MutationApplied)
//!     .with_mutation("set-process-plan")
//!     .with_attempt(1);
//!
//! assert_eq!(ev.kind, EventKind::MutationApplied);
//! assert_eq!(ev.mutation, Some("set-process-plan"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Invocation lifecycle ===
    /// One reconcile invocation has started.
    ///
    /// Sets:
    /// - `trigger`: triggering event label
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReconcileStarted,

    /// The invocation finished and produced a status.
    ///
    /// Sets:
    /// - `reason`: final status line
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReconcileFinished,

    // === Read stage ===
    /// A sub-read of observed state failed after retries.
    ///
    /// Sets:
    /// - `source`: read source label (e.g., "supervisor", "relation-3")
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReadFailed,

    // === Build stage ===
    /// Declared options were rejected by the schema.
    ///
    /// Sets:
    /// - `reason`: validation message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    OptionsRejected,

    /// Storage is not attached yet; nothing can be applied.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AwaitingStorage,

    // === Remote call retries ===
    /// A remote call failed transiently; the next attempt is scheduled.
    ///
    /// Sets:
    /// - `call`: remote call label
    /// - `attempt`: attempt number that failed (1-based)
    /// - `delay_ms`: delay before the next attempt (ms)
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RemoteRetryScheduled,

    // === Apply stage ===
    /// A mutation was applied to the remote system.
    ///
    /// Sets:
    /// - `mutation`: mutation label
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    MutationApplied,

    /// A mutation failed after exhausting its retries; the sequence aborts.
    ///
    /// Sets:
    /// - `mutation`: mutation label
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    MutationFailed,

    // === Publish stage ===
    /// A relation record was written (owned fields only).
    ///
    /// Sets:
    /// - `relation`: relation label (e.g., "ingress-requester/3")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RelationPublished,

    /// A relation was ignored (tie-break loser or nothing known to publish).
    ///
    /// Sets:
    /// - `relation`: relation label
    /// - `reason`: why it was ignored
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RelationIgnored,

    /// Writing a relation record failed after retries.
    ///
    /// Sets:
    /// - `relation`: relation label
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RelationPublishFailed,
}

/// Diagnostic event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Event classification.
    pub kind: EventKind,
    /// Triggering event label, if applicable.
    pub trigger: Option<Arc<str>>,
    /// Read source label, if applicable.
    pub source: Option<Arc<str>>,
    /// Remote call label, if applicable.
    pub call: Option<Arc<str>>,
    /// Mutation label, if applicable.
    pub mutation: Option<&'static str>,
    /// Relation label, if applicable.
    pub relation: Option<Arc<str>>,
    /// Human-readable reason (errors, status line, tie-break details).
    pub reason: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Backoff delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            trigger: None,
            source: None,
            call: None,
            mutation: None,
            relation: None,
            reason: None,
            attempt: None,
            delay_ms: None,
        }
    }

    /// Attaches a triggering event label.
    #[inline]
    pub fn with_trigger(mut self, trigger: impl Into<Arc<str>>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Attaches a read source label.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a remote call label.
    #[inline]
    pub fn with_call(mut self, call: impl Into<Arc<str>>) -> Self {
        self.call = Some(call.into());
        self
    }

    /// Attaches a mutation label.
    #[inline]
    pub fn with_mutation(mut self, mutation: &'static str) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Attaches a relation label.
    #[inline]
    pub fn with_relation(mut self, relation: impl Into<Arc<str>>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }
}
