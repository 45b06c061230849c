//! Value objects exchanged between pipeline stages.
//!
//! Everything here is plain data with structural equality — no identity, no
//! I/O. [`DesiredConfig`] is rebuilt from scratch every invocation;
//! [`ObservedState`] is fetched fresh and never mutated, only replaced.
//!
//! ## Contents
//! - [`ProcessPlan`], [`ProcessState`], [`ReadinessCheck`] supervisor-facing types
//! - [`StorageStatus`] attached/mounted storage facts
//! - [`RelationId`], [`RelationRole`], [`RelationSnapshot`] relation data
//! - [`DesiredConfig`], [`LicenseSpec`] the complete desired configuration
//! - [`ObservedState`], [`ReadFailure`], [`ReadSource`] observed remote facts

mod desired;
mod observed;
mod plan;
mod relation;
mod storage;

pub use desired::{DesiredConfig, LicenseSpec};
pub use observed::{ObservedState, ReadFailure, ReadSource};
pub use plan::{ProcessPlan, ProcessState, ReadinessCheck};
pub use relation::{
    fields, select_primaries, IgnoredRelation, RelationId, RelationRole, RelationSnapshot,
};
pub use storage::StorageStatus;
