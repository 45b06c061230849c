//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into
//! the pipeline: structured logging, metrics counters, audit records.
//!
//! ## Contract
//! - Handlers are awaited **inline** between pipeline steps; keep them short
//!   or hand the event off to your own channel.
//! - Handlers must not assume any event arrives twice or is persisted — the
//!   invocation exits after the final `ReconcileFinished`.

use crate::events::Event;
use async_trait::async_trait;

/// Contract for diagnostic event subscribers.
///
/// Called sequentially from the reconciler between pipeline steps.
/// Implementations should avoid blocking the async runtime (prefer async I/O
/// and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for panic reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
