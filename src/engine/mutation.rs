//! # The closed set of remote mutations.
//!
//! Every change the controller can make to the remote system is one of these
//! variants. All of them are *set to desired state* operations — applying the
//! same mutation twice is a no-op on the remote side.

use crate::model::{LicenseSpec, ProcessPlan};

/// One idempotent remote mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Mount the attached storage into the workload container.
    MountStorage,
    /// Write the license artifact into the workload filesystem.
    PushLicense(LicenseSpec),
    /// Replace the supervisor's process plan.
    SetProcessPlan(ProcessPlan),
    /// Start the process under the installed plan.
    StartProcess,
    /// Restart the process so it picks up a changed plan.
    RestartProcess,
}

impl Mutation {
    /// Returns the stable kebab-case label used in diagnostics and outcomes.
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::MountStorage => "mount-storage",
            Mutation::PushLicense(_) => "push-license",
            Mutation::SetProcessPlan(_) => "set-process-plan",
            Mutation::StartProcess => "start-process",
            Mutation::RestartProcess => "restart-process",
        }
    }
}
