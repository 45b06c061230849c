//! # In-memory remote backends.
//!
//! Process-local implementations of the three remote seams, with failure
//! injection. They exist for tests, examples, and embedding experiments —
//! a real deployment points the reconciler at actual platform clients.
//!
//! ## Failure injection
//! - `set_unavailable(true)` makes every call on that backend fail with a
//!   transient [`RemoteError::Unavailable`].
//! - `MemoryRelations::fail_data_reads(id, true)` fails only the data-bag
//!   reads of one relation, which is how partial-read degradation is tested.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::{
    LicenseSpec, ProcessPlan, ProcessState, RelationId, RelationRole, StorageStatus,
};
use crate::remote::{RelationStore, StorageApi, SupervisorApi};

/// Locks a std mutex, recovering the guard from a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unavailable() -> RemoteError {
    RemoteError::Unavailable {
        error: "injected outage".into(),
    }
}

// ---- Supervisor ----

#[derive(Default)]
struct SupervisorInner {
    plan: Option<ProcessPlan>,
    process: Option<ProcessState>,
    files: BTreeMap<String, Vec<u8>>,
    unavailable: bool,
}

/// In-memory [`SupervisorApi`].
#[derive(Default)]
pub struct MemorySupervisor {
    inner: Mutex<SupervisorInner>,
}

impl MemorySupervisor {
    /// Creates a supervisor with no plan and a never-started process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail transiently while set.
    pub fn set_unavailable(&self, value: bool) {
        lock(&self.inner).unavailable = value;
    }

    /// Overrides the reported process state (e.g. to simulate a crash).
    pub fn set_process_state(&self, state: ProcessState) {
        lock(&self.inner).process = Some(state);
    }

    /// Returns the currently installed plan, for assertions.
    pub fn plan_snapshot(&self) -> Option<ProcessPlan> {
        lock(&self.inner).plan.clone()
    }

    /// Returns a pushed file's contents, for assertions.
    pub fn file_snapshot(&self, path: &str) -> Option<Vec<u8>> {
        lock(&self.inner).files.get(path).cloned()
    }
}

#[async_trait]
impl SupervisorApi for MemorySupervisor {
    async fn plan(&self) -> Result<Option<ProcessPlan>, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner.plan.clone())
    }

    async fn process_state(&self) -> Result<ProcessState, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner.process.unwrap_or(ProcessState::NotStarted))
    }

    async fn set_plan(&self, plan: &ProcessPlan) -> Result<(), RemoteError> {
        let mut inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        inner.plan = Some(plan.clone());
        Ok(())
    }

    async fn start(&self) -> Result<(), RemoteError> {
        let mut inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.plan.is_none() {
            return Err(RemoteError::Rejected {
                error: "no process plan installed".into(),
            });
        }
        inner.process = Some(ProcessState::Running);
        Ok(())
    }

    async fn restart(&self) -> Result<(), RemoteError> {
        let mut inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.plan.is_none() {
            return Err(RemoteError::Rejected {
                error: "no process plan installed".into(),
            });
        }
        inner.process = Some(ProcessState::Running);
        Ok(())
    }

    async fn push_file(&self, path: &str, contents: &[u8]) -> Result<(), RemoteError> {
        let mut inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        inner.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    async fn file_digest(&self, path: &str) -> Result<Option<String>, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner.files.get(path).map(|b| LicenseSpec::sha256_of(b)))
    }
}

// ---- Storage ----

struct StorageInner {
    status: StorageStatus,
    unavailable: bool,
}

/// In-memory [`StorageApi`].
pub struct MemoryStorage {
    inner: Mutex<StorageInner>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            inner: Mutex::new(StorageInner {
                status: StorageStatus::detached(),
                unavailable: false,
            }),
        }
    }
}

impl MemoryStorage {
    /// Creates storage in the detached state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches storage (unmounted) at the given path.
    pub fn attach(&self, path: &str, capacity_bytes: u64) {
        lock(&self.inner).status = StorageStatus::attached(path, capacity_bytes);
    }

    /// Makes every call fail transiently while set.
    pub fn set_unavailable(&self, value: bool) {
        lock(&self.inner).unavailable = value;
    }

    /// Returns the current status, for assertions.
    pub fn status_snapshot(&self) -> StorageStatus {
        lock(&self.inner).status.clone()
    }
}

#[async_trait]
impl StorageApi for MemoryStorage {
    async fn status(&self) -> Result<StorageStatus, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner.status.clone())
    }

    async fn mount(&self) -> Result<(), RemoteError> {
        let mut inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        if !inner.status.attached {
            return Err(RemoteError::Rejected {
                error: "no storage attached".into(),
            });
        }
        inner.status.mounted = true;
        Ok(())
    }
}

// ---- Relations ----

struct RelationEntry {
    role: RelationRole,
    peer: BTreeMap<String, String>,
    local: BTreeMap<String, String>,
}

#[derive(Default)]
struct RelationsInner {
    entries: BTreeMap<RelationId, RelationEntry>,
    failing_reads: BTreeSet<RelationId>,
    unavailable: bool,
}

/// In-memory [`RelationStore`].
#[derive(Default)]
pub struct MemoryRelations {
    inner: Mutex<RelationsInner>,
}

impl MemoryRelations {
    /// Creates an empty relation store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establishes a relation with the given peer-published fields.
    pub fn add(&self, id: RelationId, role: RelationRole, peer: &[(&str, &str)]) {
        let peer = peer
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        lock(&self.inner).entries.insert(
            id,
            RelationEntry {
                role,
                peer,
                local: BTreeMap::new(),
            },
        );
    }

    /// Makes the data-bag reads of one relation fail transiently while set.
    pub fn fail_data_reads(&self, id: RelationId, value: bool) {
        let mut inner = lock(&self.inner);
        if value {
            inner.failing_reads.insert(id);
        } else {
            inner.failing_reads.remove(&id);
        }
    }

    /// Makes every call fail transiently while set.
    pub fn set_unavailable(&self, value: bool) {
        lock(&self.inner).unavailable = value;
    }

    /// Returns the fields we last published on a relation, for assertions.
    pub fn published(&self, id: RelationId) -> Option<BTreeMap<String, String>> {
        lock(&self.inner).entries.get(&id).map(|e| e.local.clone())
    }
}

#[async_trait]
impl RelationStore for MemoryRelations {
    async fn relations(&self) -> Result<Vec<(RelationId, RelationRole)>, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner.entries.iter().map(|(id, e)| (*id, e.role)).collect())
    }

    async fn peer_data(&self, id: RelationId) -> Result<BTreeMap<String, String>, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable || inner.failing_reads.contains(&id) {
            return Err(unavailable());
        }
        match inner.entries.get(&id) {
            Some(entry) => Ok(entry.peer.clone()),
            None => Err(RemoteError::Rejected {
                error: format!("unknown relation {}", id.0),
            }),
        }
    }

    async fn local_data(&self, id: RelationId) -> Result<BTreeMap<String, String>, RemoteError> {
        let inner = lock(&self.inner);
        if inner.unavailable || inner.failing_reads.contains(&id) {
            return Err(unavailable());
        }
        match inner.entries.get(&id) {
            Some(entry) => Ok(entry.local.clone()),
            None => Err(RemoteError::Rejected {
                error: format!("unknown relation {}", id.0),
            }),
        }
    }

    async fn publish(
        &self,
        id: RelationId,
        fields: BTreeMap<String, String>,
    ) -> Result<(), RemoteError> {
        let mut inner = lock(&self.inner);
        if inner.unavailable {
            return Err(unavailable());
        }
        match inner.entries.get_mut(&id) {
            Some(entry) => {
                entry.local = fields;
                Ok(())
            }
            None => Err(RemoteError::Rejected {
                error: format!("unknown relation {}", id.0),
            }),
        }
    }
}
