//! # convisor
//!
//! **Convisor** is a reconciliation-controller library for a single supervised
//! workload running inside a container platform.
//!
//! Each triggering event (config change, relation update, storage attachment,
//! timer) starts one invocation: the controller rebuilds the complete desired
//! configuration from external truth, diffs it against observed remote state,
//! applies the minimal ordered mutations, republishes relation data, and
//! reports a single-line status. Then it exits. Nothing is remembered between
//! invocations — all "memory" lives in the shared remote stores.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   options map      relation bags       storage status      supervisor API
//!       │                 │                    │                   │
//!       ▼                 ▼                    ▼                   ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Read  (remote::read_observed)                                        │
//! │  - each sub-read independently retried with bounded backoff           │
//! │  - failures collected, never fatal to the other reads                 │
//! └──────────────────────────────────┬────────────────────────────────────┘
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Build  (builder::build — pure)                                       │
//! │  - typed option schema, tie-breaks, env mapping                       │
//! │  - storage unattached → AwaitingStorage, not an error                 │
//! └──────────────────────────────────┬────────────────────────────────────┘
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Diff & Apply  (engine)                                               │
//! │  mount-storage → push-license → set-process-plan → start/restart      │
//! │  - per-mutation bounded retries, abort on exhaustion, no rollback     │
//! └──────────────────────────────────┬────────────────────────────────────┘
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Publish  (publish — ALWAYS runs, best currently-known state)         │
//! │  - owned fields only, skipped when unchanged                          │
//! └──────────────────────────────────┬────────────────────────────────────┘
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Report  (status::summarize)                                          │
//! │  Active │ Waiting │ Blocked │ Error  + one-line message               │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Diagnostics flow on a secondary channel the whole way through:
//! every stage emits [`Event`]s to the registered [`Subscribe`]rs.
//!
//! ### Lifecycle
//! ```text
//! Trigger ──► Reconciler::handle(trigger, token)
//!
//!   ├─► Read      — fetch observed state (partial failures tolerated)
//!   ├─► Build     — pure; Blocked on invalid options, Waiting on storage
//!   ├─► Diff&Apply— ordered idempotent mutations with bounded retries
//!   ├─► Publish   — always; peers never keep stale endpoints
//!   └─► Report    — every invocation terminates with a StatusReport
//!
//! Failure in any step jumps to Report (Publish still runs).
//! Convergence across retries = the platform re-invoking handle(),
//! never the controller blocking internally.
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                       |
//! |-------------------|----------------------------------------------------------------------|------------------------------------------|
//! | **Controller**    | One entry point per triggering event.                                | [`Reconciler`], [`Trigger`]              |
//! | **Remote seams**  | Supervisor, storage, and relation-store APIs as async traits.        | [`SupervisorApi`], [`StorageApi`], [`RelationStore`] |
//! | **Desired state** | Pure builder from options + relations + storage.                     | [`Options`], [`DesiredConfig`]           |
//! | **Diff & apply**  | Minimal ordered mutations, idempotent by construction.               | [`Mutation`], [`diff`]                   |
//! | **Status**        | Four-state external surface with one-line messages.                  | [`StatusReport`], [`Verdict`]            |
//! | **Policies**      | Bounded retries, backoff, jitter at the remote seam.                 | [`RetryPolicy`], [`BackoffPolicy`]       |
//! | **Diagnostics**   | Per-stage events fanned out to subscribers.                          | [`Event`], [`Subscribe`]                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use convisor::{
//!     Identity, MemoryRelations, MemoryStorage, MemorySupervisor, Reconciler, Trigger,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let supervisor = Arc::new(MemorySupervisor::new());
//!     let storage = Arc::new(MemoryStorage::new());
//!     storage.attach("/data", 10 << 30);
//!     let relations = Arc::new(MemoryRelations::new());
//!
//!     let mut options = BTreeMap::new();
//!     options.insert("port".to_string(), "8383".to_string());
//!
//!     let reconciler = Reconciler::builder(
//!         Identity::new("store", "prod"),
//!         supervisor.clone(),
//!         storage,
//!         relations,
//!     )
//!     .with_options(options)
//!     .build();
//!
//!     let outcome = reconciler
//!         .handle(Trigger::ConfigChanged, CancellationToken::new())
//!         .await;
//!
//!     // First invocation converges the fresh workload...
//!     assert_eq!(
//!         outcome.mutation_labels(),
//!         vec!["mount-storage", "set-process-plan", "start-process"]
//!     );
//!     assert_eq!(outcome.status.as_label(), "active");
//!     // ...and the embedding process exits 0 regardless of the status:
//!     // fatal misconfiguration is a Blocked status, not an exit code.
//! }
//! ```

mod builder;
mod config;
mod controller;
mod engine;
mod error;
mod events;
mod model;
mod policies;
mod publish;
mod remote;
mod status;
mod subscribers;

// ---- Public re-exports ----

pub use builder::{build, BuildOutcome};
pub use config::{Identity, LogLevel, Options};
pub use controller::{ReconcileOutcome, Reconciler, ReconcilerBuilder, Trigger, Verdict};
pub use engine::{apply, diff, ApplyError, Mutation};
pub use error::{ConfigError, RemoteError};
pub use events::{Event, EventKind};
pub use model::{
    fields, select_primaries, DesiredConfig, IgnoredRelation, LicenseSpec, ObservedState,
    ProcessPlan, ProcessState, ReadFailure, ReadSource, ReadinessCheck, RelationId, RelationRole,
    RelationSnapshot, StorageStatus,
};
pub use policies::{BackoffPolicy, JitterPolicy, RetryPolicy};
pub use publish::{publish_all, record_for, PublishInputs, PublishReport};
pub use remote::{
    read_observed, MemoryRelations, MemoryStorage, MemorySupervisor, RelationStore, StorageApi,
    SupervisorApi,
};
pub use status::{summarize, StatusReport};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
