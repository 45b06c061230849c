//! # Bounded retry policy for remote calls.
//!
//! [`RetryPolicy`] bundles the three knobs that govern a single remote call:
//! how many attempts it gets, how long each attempt may run, and how long to
//! wait between attempts. The retry loop itself lives at the remote seam
//! (`remote::with_retries`); this type is pure data so the desired-state
//! pipeline stays trivially unit-testable.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Bounded retry discipline for one remote call.
///
/// ## Field semantics
/// - `attempts`: hard bound on tries (min 1; clamped by the retry loop)
/// - `call_timeout`: applied around **every** attempt individually
/// - `backoff`: delay schedule between attempts, indexed by attempt number
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Maximum number of attempts for a single remote call.
    pub attempts: u32,

    /// Per-attempt timeout; a call that exceeds it counts as a transient failure.
    pub call_timeout: Duration,

    /// Delay schedule between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    /// Default discipline:
    ///
    /// - `attempts = 3`
    /// - `call_timeout = 10s`
    /// - `backoff = BackoffPolicy::default()` (100ms, ×2, capped at 5s)
    fn default() -> Self {
        Self {
            attempts: 3,
            call_timeout: Duration::from_secs(10),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl RetryPolicy {
    /// Returns the attempt bound clamped to a minimum of 1.
    ///
    /// The retry loop uses this value to avoid a zero-attempt policy
    /// silently skipping every remote call.
    #[inline]
    pub fn attempts_clamped(&self) -> u32 {
        self.attempts.max(1)
    }
}
