//! The reconciliation controller: root of the pipeline.
//!
//! One [`Reconciler`] instance handles one triggering event and exits. It
//! sequences the whole pipeline — read, build, diff & apply, publish,
//! report — and converts every failure into a [`StatusReport`](crate::StatusReport);
//! nothing escapes [`Reconciler::handle`] as an error.

mod core;
mod outcome;
mod trigger;

pub use core::{Reconciler, ReconcilerBuilder};
pub use outcome::{ReconcileOutcome, Verdict};
pub use trigger::Trigger;
