//! Retry discipline for remote calls.
//!
//! This module groups the knobs that control **how often** a failed remote
//! call is re-attempted and **how long** to wait between attempts.
//!
//! ## Contents
//! - [`RetryPolicy`] bounded attempts + per-call timeout for one remote call
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid synchronized retries
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy { attempts, call_timeout, backoff: BackoffPolicy }
//!      └─► remote::with_retries uses:
//!           - call_timeout around every single remote call
//!           - attempts as the hard retry bound
//!           - backoff.next(attempt) to schedule the next attempt
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → 3 attempts, 10s per-call timeout.
//! - `BackoffPolicy::default()` → first=100ms, factor=2.0, max=5s, jitter=None.

mod backoff;
mod jitter;
mod retry;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
