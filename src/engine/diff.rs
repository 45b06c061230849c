//! # Structural diff between desired and observed state.
//!
//! Produces the ordered mutation list that converges the remote system to
//! the desired configuration. The comparison is purely structural:
//!
//! - an unmounted storage yields `mount-storage`;
//! - a license digest mismatch yields `push-license`;
//! - a plan mismatch yields `set-process-plan`, and additionally
//!   `restart-process` when the process is currently up (it must pick up the
//!   new plan);
//! - a down process under a matching plan yields `start-process` only —
//!   status-only drift never rewrites the plan.
//!
//! When observed already matches desired, the result is empty, and the
//! invocation touches nothing remote.

use crate::engine::Mutation;
use crate::model::{DesiredConfig, ObservedState};

/// Computes the ordered mutations needed to reach `desired`.
pub fn diff(desired: &DesiredConfig, observed: &ObservedState) -> Vec<Mutation> {
    let mut mutations = Vec::new();

    if !observed.storage.mounted {
        mutations.push(Mutation::MountStorage);
    }

    if let Some(license) = &desired.license {
        if observed.license_digest.as_deref() != Some(license.sha256.as_str()) {
            mutations.push(Mutation::PushLicense(license.clone()));
        }
    }

    let plan_changed = observed.plan.as_ref() != Some(&desired.plan);
    if plan_changed {
        mutations.push(Mutation::SetProcessPlan(desired.plan.clone()));
    }

    if plan_changed && observed.process.is_up() {
        mutations.push(Mutation::RestartProcess);
    } else if observed.process.needs_start() {
        mutations.push(Mutation::StartProcess);
    }

    mutations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        LicenseSpec, ProcessPlan, ProcessState, ReadinessCheck, StorageStatus,
    };
    use std::collections::BTreeMap;

    fn plan(env: &[(&str, &str)]) -> ProcessPlan {
        ProcessPlan {
            service: "store".into(),
            command: "store".into(),
            args: Vec::new(),
            environment: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            readiness: Some(ReadinessCheck {
                path: "/prod-store/api/v1/info".into(),
                port: 8383,
                period_seconds: 30,
            }),
        }
    }

    fn desired(env: &[(&str, &str)]) -> DesiredConfig {
        DesiredConfig {
            plan: plan(env),
            port: 8383,
            data_path: "/var/lib/workload".into(),
            license: None,
        }
    }

    fn observed(
        current: Option<ProcessPlan>,
        process: ProcessState,
        mounted: bool,
    ) -> ObservedState {
        let mut storage = StorageStatus::attached("/data", 1 << 30);
        storage.mounted = mounted;
        ObservedState {
            plan: current,
            process,
            storage,
            relations: Vec::new(),
            license_digest: None,
            failures: Vec::new(),
        }
    }

    fn labels(mutations: &[Mutation]) -> Vec<&'static str> {
        mutations.iter().map(Mutation::label).collect()
    }

    #[test]
    fn test_fresh_workload_full_sequence() {
        let d = desired(&[("SERVICE_PORT", "8383")]);
        let o = observed(None, ProcessState::NotStarted, false);
        assert_eq!(
            labels(&diff(&d, &o)),
            vec!["mount-storage", "set-process-plan", "start-process"]
        );
    }

    #[test]
    fn test_converged_is_empty() {
        let d = desired(&[("SERVICE_PORT", "8383")]);
        let o = observed(Some(d.plan.clone()), ProcessState::Running, true);
        assert!(diff(&d, &o).is_empty());
    }

    #[test]
    fn test_environment_change_restarts() {
        let d = desired(&[("SERVICE_PORT", "8383"), ("SERVICE_RETENTION_DAYS", "30")]);
        let running = plan(&[("SERVICE_PORT", "8383")]);
        let o = observed(Some(running), ProcessState::Running, true);
        assert_eq!(
            labels(&diff(&d, &o)),
            vec!["set-process-plan", "restart-process"],
            "storage mutation must be absent"
        );
    }

    #[test]
    fn test_crashed_process_starts_without_plan_rewrite() {
        let d = desired(&[("SERVICE_PORT", "8383")]);
        let o = observed(Some(d.plan.clone()), ProcessState::Errored, true);
        assert_eq!(labels(&diff(&d, &o)), vec!["start-process"]);
    }

    #[test]
    fn test_plan_change_while_down_starts_instead_of_restarting() {
        let d = desired(&[("SERVICE_PORT", "9090")]);
        let stale = plan(&[("SERVICE_PORT", "8383")]);
        let o = observed(Some(stale), ProcessState::Stopped, true);
        assert_eq!(
            labels(&diff(&d, &o)),
            vec!["set-process-plan", "start-process"]
        );
    }

    #[test]
    fn test_license_digest_mismatch_pushes() {
        let mut d = desired(&[("SERVICE_PORT", "8383")]);
        d.license = Some(LicenseSpec::new("/lic", b"fresh".to_vec()));
        let mut o = observed(Some(d.plan.clone()), ProcessState::Running, true);
        o.license_digest = Some(LicenseSpec::sha256_of(b"stale"));

        assert_eq!(labels(&diff(&d, &o)), vec!["push-license"]);
    }

    #[test]
    fn test_license_digest_match_is_noop() {
        let mut d = desired(&[("SERVICE_PORT", "8383")]);
        d.license = Some(LicenseSpec::new("/lic", b"same".to_vec()));
        let mut o = observed(Some(d.plan.clone()), ProcessState::Running, true);
        o.license_digest = Some(LicenseSpec::sha256_of(b"same"));

        assert!(diff(&d, &o).is_empty());
    }

    #[test]
    fn test_ordering_when_everything_is_needed() {
        let mut d = desired(&[("SERVICE_PORT", "8383")]);
        d.license = Some(LicenseSpec::new("/lic", b"key".to_vec()));
        let o = observed(None, ProcessState::NotStarted, false);

        assert_eq!(
            labels(&diff(&d, &o)),
            vec![
                "mount-storage",
                "push-license",
                "set-process-plan",
                "start-process"
            ]
        );
    }

    #[test]
    fn test_environment_comparison_is_order_independent() {
        // BTreeMap keys are sorted, so two plans built from differently
        // ordered inputs compare equal.
        let mut env_a = BTreeMap::new();
        env_a.insert("A".to_string(), "1".to_string());
        env_a.insert("B".to_string(), "2".to_string());
        let mut env_b = BTreeMap::new();
        env_b.insert("B".to_string(), "2".to_string());
        env_b.insert("A".to_string(), "1".to_string());
        assert_eq!(env_a, env_b);
    }
}
