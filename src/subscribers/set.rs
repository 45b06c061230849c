//! # SubscriberSet: ordered fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to all
//! subscribers, awaiting them one by one in registration order.
//!
//! ## What it guarantees
//! - Delivery order matches emission order (a single invocation is sequential).
//! - Panics inside subscribers are caught and reported (isolation).
//!
//! ## What it does **not** guarantee
//! - Delivery after the invocation returns — nothing is buffered.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use convisor::{Event, EventKind, Subscribe, SubscriberSet};
//!
//! struct Printer;
//! #[async_trait::async_trait]
//! impl Subscribe for Printer {
//!     async fn on_event(&self, ev: &Event) { let _ = ev; }
//!     fn name(&self) -> &'static str { "printer" }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let set = SubscriberSet::new(vec![Arc::new(Printer) as _]);
//! set.emit(&Event::new(EventKind::ReconcileStarted)).await;
//! # });
//! ```

use std::sync::Arc;

use futures::FutureExt;

use crate::events::Event;

use super::Subscribe;

/// Composite fan-out delivering events to every subscriber in order.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a new set from the given subscribers.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Creates an empty set (events are dropped).
    #[must_use]
    pub fn empty() -> Self {
        Self { subs: Vec::new() }
    }

    /// Returns the number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Returns `true` when no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers one event to every subscriber, in registration order.
    ///
    /// A panicking subscriber is isolated: the panic is caught, reported to
    /// stderr, and delivery continues with the next subscriber.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            let fut = sub.on_event(event);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                eprintln!(
                    "[convisor] subscriber '{}' panicked: {:?}",
                    sub.name(),
                    panic_err
                );
            }
        }
    }
}
