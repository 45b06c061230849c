//! Remote seams: the three external APIs and the state readers over them.
//!
//! Every suspension point of the pipeline lives behind one of these traits.
//! They are the only places the controller performs I/O, and every call runs
//! under a per-call timeout with bounded retries
//! (see [`RetryPolicy`](crate::RetryPolicy)).
//!
//! ## Contents
//! - [`SupervisorApi`] process plan, state, start/restart, file push
//! - [`StorageApi`] storage status and mount
//! - [`RelationStore`] relation listing and per-field-owner data bags
//! - [`read_observed`] the aggregate reader with partial-failure tolerance
//! - [`MemorySupervisor`], [`MemoryStorage`], [`MemoryRelations`] in-memory
//!   backends with failure injection, for tests and embedding experiments
//!
//! ## Mutation discipline
//! All write operations are **set to desired state**, never relative deltas:
//! applying the same mutation twice must be a no-op on the remote side.

mod memory;
mod reader;
mod relations;
mod retrying;
mod storage;
mod supervisor;

pub use memory::{MemoryRelations, MemoryStorage, MemorySupervisor};
pub use reader::read_observed;
pub use relations::RelationStore;
pub(crate) use retrying::with_retries;
pub use storage::StorageApi;
pub use supervisor::SupervisorApi;
