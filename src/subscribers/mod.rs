//! # Event subscribers for the diagnostics channel.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used by the reconciler to deliver [`Event`](crate::events::Event)s.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   pipeline ── emit(&Event) ──► SubscriberSet ──► sequential fan-out
//!                                     │
//!                                ┌────┴────┬─────────┐
//!                                ▼         ▼         ▼
//!                             LogWriter  Metrics  Custom ...
//! ```
//!
//! One invocation is single-threaded and runs to completion, so delivery is
//! **sequential and awaited in order** — there are no background workers or
//! queues to drain before the process exits. A panicking subscriber is
//! isolated and reported; it never takes the invocation down.
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use convisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct MetricsSubscriber;
//!
//! #[async_trait]
//! impl Subscribe for MetricsSubscriber {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::MutationFailed {
//!             // increment failure counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
