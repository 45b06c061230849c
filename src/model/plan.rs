//! # Supervisor-facing process types.
//!
//! [`ProcessPlan`] is the declarative description handed to the remote
//! supervisor: what to run, with which arguments and environment, and how to
//! probe readiness. [`ProcessState`] is the supervisor's report of what the
//! process is currently doing.
//!
//! Plan comparison is plain structural equality; the diff engine decides
//! between a restart and a bare start from it, never from status flags alone.

use std::collections::BTreeMap;

use serde::Serialize;

/// Declarative process description for the remote supervisor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessPlan {
    /// Service name under which the supervisor tracks the process.
    pub service: String,
    /// Executable to run.
    pub command: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Environment map (sorted; comparison must be order-independent).
    pub environment: BTreeMap<String, String>,
    /// Optional readiness probe definition.
    pub readiness: Option<ReadinessCheck>,
}

/// HTTP readiness probe definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReadinessCheck {
    /// Probe path, e.g. `/store/api/v1/info`.
    pub path: String,
    /// Probe port.
    pub port: u16,
    /// Probe period in seconds.
    pub period_seconds: u64,
}

/// Supervisor-reported state of the managed process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    /// No process has been started under the current plan.
    NotStarted,
    /// The process is starting but not ready yet.
    Starting,
    /// The process is running.
    Running,
    /// The process exited cleanly.
    Stopped,
    /// The process exited with an error or crashed.
    Errored,
}

impl ProcessState {
    /// Returns `true` while the process is up (starting counts as up —
    /// issuing a start against it would race the supervisor).
    #[inline]
    pub fn is_up(&self) -> bool {
        matches!(self, ProcessState::Starting | ProcessState::Running)
    }

    /// Returns `true` when a start (not a restart) is the right recovery.
    ///
    /// Status-only drift — a crashed or never-started process under a
    /// matching plan — is corrected by a start, never a plan rewrite.
    #[inline]
    pub fn needs_start(&self) -> bool {
        matches!(
            self,
            ProcessState::NotStarted | ProcessState::Stopped | ProcessState::Errored
        )
    }

    /// Returns a short stable label (kebab-case) for diagnostics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessState::NotStarted => "not-started",
            ProcessState::Starting => "starting",
            ProcessState::Running => "running",
            ProcessState::Stopped => "stopped",
            ProcessState::Errored => "errored",
        }
    }
}
