//! Diagnostic events: the secondary channel of the pipeline.
//!
//! Every invocation narrates itself through [`Event`]s — what was read, what
//! failed, which mutations were applied, which relations were published. The
//! primary outward surface stays the single-line
//! [`StatusReport`](crate::StatusReport); detail that would not fit a status
//! message belongs here.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: the reconciler pipeline (reader, engine, publishers, report).
//! - **Consumers**: [`Subscribe`](crate::Subscribe) implementations fanned out by
//!   [`SubscriberSet`](crate::SubscriberSet).

mod event;

pub use event::{Event, EventKind};
