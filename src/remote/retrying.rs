//! # Bounded-retry wrapper for one remote call.
//!
//! Every remote call in the pipeline goes through [`with_retries`]:
//!
//! - each attempt runs under the policy's per-call timeout;
//! - transient failures ([`RemoteError::is_retryable`]) are re-attempted up
//!   to the policy's bound, sleeping `backoff.next(attempt)` in between;
//! - rejections return immediately — the remote gave a deliberate answer;
//! - cancellation is honored before every attempt and during every sleep.
//!
//! ## Rules
//! - Exactly one terminal result per call: `Ok`, the last transient error,
//!   a rejection, or `Canceled`.
//! - A scheduled retry is announced via [`EventKind::RemoteRetryScheduled`].

use std::future::Future;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::RemoteError;
use crate::events::{Event, EventKind};
use crate::policies::RetryPolicy;
use crate::subscribers::SubscriberSet;

/// Executes `call` with bounded retries, per-attempt timeout, and backoff.
///
/// `label` names the call in diagnostics (e.g. `"set-process-plan"`).
pub(crate) async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    token: &CancellationToken,
    subs: &SubscriberSet,
    label: &'static str,
    mut call: F,
) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let attempts = policy.attempts_clamped();

    let mut last = RemoteError::Canceled;
    for attempt in 0..attempts {
        if token.is_cancelled() {
            return Err(RemoteError::Canceled);
        }

        let result = match time::timeout(policy.call_timeout, call()).await {
            Ok(r) => r,
            Err(_elapsed) => Err(RemoteError::Timeout {
                timeout: policy.call_timeout,
            }),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => last = e,
        }

        if attempt + 1 == attempts {
            break;
        }

        let delay = policy.backoff.next(attempt);
        subs.emit(
            &Event::new(EventKind::RemoteRetryScheduled)
                .with_call(label)
                .with_attempt(attempt + 1)
                .with_delay(delay)
                .with_reason(last.as_message()),
        )
        .await;

        tokio::select! {
            _ = time::sleep(delay) => {}
            _ = token.cancelled() => return Err(RemoteError::Canceled),
        }
    }

    Err(last)
}
