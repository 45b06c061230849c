//! # The complete desired configuration.
//!
//! [`DesiredConfig`] is the output of the desired-state builder: a pure value
//! computed from declared options, relation data, and storage status.
//! It is immutable once built, rebuilt from scratch every invocation, and has
//! no identity beyond structural equality — which is exactly what makes the
//! idempotence check (`desired == implied-by-observed`) possible.

use sha2::{Digest, Sha256};

use crate::model::ProcessPlan;

/// Desired configuration for the managed workload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredConfig {
    /// Desired supervisor process plan.
    pub plan: ProcessPlan,
    /// Workload listening port.
    pub port: u16,
    /// Data directory the storage must be mounted at.
    pub data_path: String,
    /// License artifact to place inside the workload, if licensing is used.
    pub license: Option<LicenseSpec>,
}

/// License artifact and its in-workload destination.
///
/// Content identity is the sha256 digest, so an unchanged license is never
/// re-pushed (the push mutation only fires on digest mismatch).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LicenseSpec {
    /// Destination path inside the workload container.
    pub dest: String,
    /// Raw artifact bytes.
    pub bytes: Vec<u8>,
    /// Hex-encoded sha256 of `bytes`.
    pub sha256: String,
}

impl LicenseSpec {
    /// Builds a spec from destination and raw bytes, computing the digest.
    pub fn new(dest: impl Into<String>, bytes: Vec<u8>) -> Self {
        let sha256 = Self::sha256_of(&bytes);
        Self {
            dest: dest.into(),
            bytes,
            sha256,
        }
    }

    /// Hex-encoded sha256 digest of the given bytes.
    pub fn sha256_of(bytes: &[u8]) -> String {
        let digest = Sha256::digest(bytes);
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}
