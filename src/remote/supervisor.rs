//! # Supervisor API seam.
//!
//! The supervisor is the remote agent that runs and monitors the workload
//! process. The controller only ever *declares* what should run
//! ([`ProcessPlan`]) and asks for start/restart; process execution mechanics
//! stay on the remote side.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::{ProcessPlan, ProcessState};

/// Remote supervisor for the managed workload process.
///
/// All mutations are idempotent: setting an identical plan, starting a
/// running process, or pushing an identical file must be no-ops remotely.
#[async_trait]
pub trait SupervisorApi: Send + Sync {
    /// Returns the currently installed process plan, if any.
    async fn plan(&self) -> Result<Option<ProcessPlan>, RemoteError>;

    /// Returns the current process state.
    async fn process_state(&self) -> Result<ProcessState, RemoteError>;

    /// Replaces the process plan with the given one.
    async fn set_plan(&self, plan: &ProcessPlan) -> Result<(), RemoteError>;

    /// Starts the process under the installed plan (no-op when running).
    async fn start(&self) -> Result<(), RemoteError>;

    /// Restarts the process so it picks up the installed plan.
    async fn restart(&self) -> Result<(), RemoteError>;

    /// Writes a file into the workload filesystem (overwrite).
    async fn push_file(&self, path: &str, contents: &[u8]) -> Result<(), RemoteError>;

    /// Returns the hex sha256 of the file at `path`, or `None` when absent.
    async fn file_digest(&self, path: &str) -> Result<Option<String>, RemoteError>;
}
