//! # Desired-state builder.
//!
//! Maps (declared options, relation data, storage status) to the complete
//! [`DesiredConfig`]. Pure — no I/O, no clock, no randomness — so the same
//! inputs always produce a structurally identical result. That determinism
//! is what makes the no-op check in the diff engine trustworthy.
//!
//! ## Rules
//! - Storage must be attached before anything can be built for it; absence
//!   yields the distinguished [`BuildOutcome::AwaitingStorage`], not an error.
//! - A configured license destination requires an attached license artifact.
//! - Conflicting same-role relations are resolved by the smallest stable
//!   relation id; losers are reported, never merged.

use std::collections::BTreeMap;

use crate::config::{Identity, Options};
use crate::error::ConfigError;
use crate::model::{
    fields, select_primaries, DesiredConfig, IgnoredRelation, LicenseSpec, ObservedState,
    ProcessPlan, ReadinessCheck, RelationRole, RelationSnapshot,
};

/// Result of one build pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Storage is not attached yet; nothing can be applied this invocation.
    AwaitingStorage,
    /// The complete desired configuration, plus tie-break losers.
    Ready {
        /// Desired configuration for the workload.
        desired: DesiredConfig,
        /// Same-role relations that lost the tie-break.
        ignored: Vec<IgnoredRelation>,
    },
}

/// Builds the desired configuration from validated inputs.
///
/// `license` carries the raw attached license artifact, when the platform
/// provides one.
pub fn build(
    options: &Options,
    identity: &Identity,
    observed: &ObservedState,
    license: Option<&[u8]>,
) -> Result<BuildOutcome, ConfigError> {
    let license = match (&options.license_path, license) {
        (Some(dest), None) => {
            return Err(ConfigError::LicenseNotAttached { dest: dest.clone() });
        }
        (Some(dest), Some(bytes)) => Some(LicenseSpec::new(dest.clone(), bytes.to_vec())),
        (None, _) => None,
    };

    if !observed.storage.attached {
        return Ok(BuildOutcome::AwaitingStorage);
    }

    let (primaries, ignored) = select_primaries(&observed.relations);
    let bucket_peer = primaries
        .get(&RelationRole::BucketConsumer)
        .and_then(|id| observed.relations.iter().find(|r| r.id == *id));

    let plan = ProcessPlan {
        service: identity.app.clone(),
        command: identity.app.clone(),
        args: Vec::new(),
        environment: environment(options, identity, bucket_peer),
        readiness: Some(ReadinessCheck {
            path: under_base(&options.base_path(identity), "api/v1/info"),
            port: options.port,
            period_seconds: 30,
        }),
    };

    Ok(BuildOutcome::Ready {
        desired: DesiredConfig {
            plan,
            port: options.port,
            data_path: options.data_path.clone(),
            license,
        },
        ignored,
    })
}

/// Complete workload environment for the given inputs.
fn environment(
    options: &Options,
    identity: &Identity,
    bucket_peer: Option<&RelationSnapshot>,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("SERVICE_PORT".into(), options.port.to_string());
    env.insert(
        "SERVICE_LOG_LEVEL".into(),
        options.log_level.as_env_value().into(),
    );
    env.insert("SERVICE_DATA_PATH".into(), options.data_path.clone());
    env.insert(
        "SERVICE_API_BASE_PATH".into(),
        options.base_path(identity),
    );
    env.insert("SERVICE_TLS".into(), options.tls.to_string());
    if let Some(days) = options.retention_days {
        env.insert("SERVICE_RETENTION_DAYS".into(), days.to_string());
    }
    if let Some(dest) = &options.license_path {
        env.insert("SERVICE_LICENSE_PATH".into(), dest.clone());
    }

    if let Some(peer) = bucket_peer {
        env.insert(
            "REPLICA_BUCKET_NAME".into(),
            options.bucket_name(identity),
        );
        if let Some(endpoint) = peer.peer.get(fields::ENDPOINT) {
            env.insert("REPLICA_BUCKET_ENDPOINT".into(), endpoint.clone());
        }
        if let Some(secret) = peer.peer.get(fields::CREDENTIALS_SECRET_REF) {
            env.insert("REPLICA_CREDENTIALS_SECRET".into(), secret.clone());
        }
    }

    env
}

/// Joins a path under the API base path without doubling slashes.
fn under_base(base: &str, suffix: &str) -> String {
    if base == "/" {
        format!("/{suffix}")
    } else {
        format!("{base}/{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProcessState, RelationId, StorageStatus};

    fn observed_with_storage() -> ObservedState {
        ObservedState {
            plan: None,
            process: ProcessState::NotStarted,
            storage: StorageStatus::attached("/data", 1 << 30),
            relations: Vec::new(),
            license_digest: None,
            failures: Vec::new(),
        }
    }

    fn identity() -> Identity {
        Identity::new("store", "prod")
    }

    fn snapshot(id: u64, role: RelationRole, peer: &[(&str, &str)]) -> RelationSnapshot {
        RelationSnapshot {
            id: RelationId(id),
            role,
            peer: peer
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            local: BTreeMap::new(),
        }
    }

    #[test]
    fn test_awaiting_storage_when_detached() {
        let mut observed = observed_with_storage();
        observed.storage = StorageStatus::detached();

        let outcome = build(&Options::default(), &identity(), &observed, None).unwrap();
        assert_eq!(outcome, BuildOutcome::AwaitingStorage);
    }

    #[test]
    fn test_build_is_deterministic() {
        let observed = observed_with_storage();
        let a = build(&Options::default(), &identity(), &observed, None).unwrap();
        let b = build(&Options::default(), &identity(), &observed, None).unwrap();
        assert_eq!(a, b, "identical inputs must yield identical output");
    }

    #[test]
    fn test_plan_environment() {
        let observed = observed_with_storage();
        let BuildOutcome::Ready { desired, .. } =
            build(&Options::default(), &identity(), &observed, None).unwrap()
        else {
            panic!("expected Ready");
        };

        let env = &desired.plan.environment;
        assert_eq!(env.get("SERVICE_PORT").unwrap(), "8383");
        assert_eq!(env.get("SERVICE_LOG_LEVEL").unwrap(), "INFO");
        assert_eq!(env.get("SERVICE_API_BASE_PATH").unwrap(), "/prod-store");
        assert_eq!(env.get("SERVICE_TLS").unwrap(), "false");
        assert!(!env.contains_key("SERVICE_RETENTION_DAYS"));
        assert_eq!(desired.plan.service, "store");
        assert_eq!(
            desired.plan.readiness.as_ref().unwrap().path,
            "/prod-store/api/v1/info"
        );
    }

    #[test]
    fn test_bucket_peer_feeds_environment() {
        let mut observed = observed_with_storage();
        observed.relations.push(snapshot(
            4,
            RelationRole::BucketConsumer,
            &[
                ("endpoint", "s3.internal:9000"),
                ("credentials-secret-ref", "secret://bucket-creds"),
            ],
        ));

        let BuildOutcome::Ready { desired, ignored } =
            build(&Options::default(), &identity(), &observed, None).unwrap()
        else {
            panic!("expected Ready");
        };

        let env = &desired.plan.environment;
        assert_eq!(env.get("REPLICA_BUCKET_NAME").unwrap(), "store-replica");
        assert_eq!(env.get("REPLICA_BUCKET_ENDPOINT").unwrap(), "s3.internal:9000");
        assert_eq!(
            env.get("REPLICA_CREDENTIALS_SECRET").unwrap(),
            "secret://bucket-creds"
        );
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_conflicting_bucket_relations_tie_break() {
        let mut observed = observed_with_storage();
        observed.relations.push(snapshot(
            9,
            RelationRole::BucketConsumer,
            &[("endpoint", "late.internal:9000")],
        ));
        observed.relations.push(snapshot(
            2,
            RelationRole::BucketConsumer,
            &[("endpoint", "early.internal:9000")],
        ));

        let BuildOutcome::Ready { desired, ignored } =
            build(&Options::default(), &identity(), &observed, None).unwrap()
        else {
            panic!("expected Ready");
        };

        assert_eq!(
            desired.plan.environment.get("REPLICA_BUCKET_ENDPOINT").unwrap(),
            "early.internal:9000",
            "smallest relation id must win"
        );
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].id, RelationId(9));
    }

    #[test]
    fn test_license_required_but_missing() {
        let observed = observed_with_storage();
        let mut options = Options::default();
        options.license_path = Some("/etc/workload/license.key".into());

        let err = build(&options, &identity(), &observed, None).unwrap_err();
        assert_eq!(err.as_label(), "config_license_not_attached");
    }

    #[test]
    fn test_license_attached_lands_in_desired() {
        let observed = observed_with_storage();
        let mut options = Options::default();
        options.license_path = Some("/etc/workload/license.key".into());

        let BuildOutcome::Ready { desired, .. } =
            build(&options, &identity(), &observed, Some(b"key-material")).unwrap()
        else {
            panic!("expected Ready");
        };

        let license = desired.license.unwrap();
        assert_eq!(license.dest, "/etc/workload/license.key");
        assert_eq!(license.sha256, LicenseSpec::sha256_of(b"key-material"));
        assert_eq!(
            desired.plan.environment.get("SERVICE_LICENSE_PATH").unwrap(),
            "/etc/workload/license.key"
        );
    }
}
