//! Error types used by the reconciliation pipeline.
//!
//! This module defines two main error enums:
//!
//! - [`RemoteError`] — failures of calls against the remote APIs (supervisor,
//!   storage, relation store).
//! - [`ConfigError`] — rejection of the declared options at the desired-state
//!   builder boundary.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for diagnostics,
//! plus [`RemoteError::is_retryable`] which drives the bounded-retry loop.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by remote API calls.
///
/// Every suspension point in the pipeline (supervisor, storage, relation store)
/// reports failures through this type. Retryable variants are re-attempted with
/// bounded backoff before they surface in the reconcile outcome.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    /// Remote call exceeded its per-call timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Remote endpoint could not be reached or answered with a transient fault.
    #[error("remote unavailable: {error}")]
    Unavailable {
        /// The underlying error message.
        error: String,
    },

    /// Remote endpoint understood the request and refused it (not retryable).
    #[error("rejected by remote: {error}")]
    Rejected {
        /// The underlying error message.
        error: String,
    },

    /// The invocation was cancelled while the call was pending.
    #[error("invocation cancelled")]
    Canceled,
}

impl RemoteError {
    /// Returns a short stable label (snake_case) for diagnostics.
    ///
    /// # Example
    /// ```
    /// use convisor::RemoteError;
    /// use std::time::Duration;
    ///
    /// let err = RemoteError::Timeout { timeout: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "remote_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RemoteError::Timeout { .. } => "remote_timeout",
            RemoteError::Unavailable { .. } => "remote_unavailable",
            RemoteError::Rejected { .. } => "remote_rejected",
            RemoteError::Canceled => "remote_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RemoteError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            RemoteError::Unavailable { error } => format!("unavailable: {error}"),
            RemoteError::Rejected { error } => format!("rejected: {error}"),
            RemoteError::Canceled => "invocation cancelled".to_string(),
        }
    }

    /// Indicates whether the call is safe to retry in place.
    ///
    /// Returns `true` for [`RemoteError::Timeout`] and
    /// [`RemoteError::Unavailable`], `false` otherwise. A rejection is a
    /// deliberate answer from the remote; retrying it in a tight loop would
    /// only repeat the same refusal.
    ///
    /// # Example
    /// ```
    /// use convisor::RemoteError;
    ///
    /// let transient = RemoteError::Unavailable { error: "refused".into() };
    /// assert!(transient.is_retryable());
    ///
    /// let terminal = RemoteError::Rejected { error: "bad plan".into() };
    /// assert!(!terminal.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RemoteError::Timeout { .. } | RemoteError::Unavailable { .. }
        )
    }
}

/// # Errors produced by option validation.
///
/// Raised when the declared options fail the fixed schema: unknown keys,
/// mistyped values, mutually exclusive settings, or a missing required
/// artifact. These are never retried — the status stays `Blocked` until the
/// operator changes the configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Option key is not part of the schema.
    #[error("unknown option: '{key}'")]
    UnknownOption {
        /// The offending key.
        key: String,
    },

    /// Option value failed to parse as its declared type.
    #[error("invalid value for '{key}': '{value}' (expected {expected})")]
    InvalidValue {
        /// The option key.
        key: String,
        /// The raw value as supplied.
        value: String,
        /// Short description of the expected type.
        expected: &'static str,
    },

    /// Log level is not one of the accepted names.
    #[error("invalid log level: '{value}'")]
    InvalidLogLevel {
        /// The raw value as supplied.
        value: String,
    },

    /// Two options that cannot be combined were both set.
    #[error("conflicting options: '{first}' and '{second}'")]
    MutuallyExclusive {
        /// First option key.
        first: &'static str,
        /// Second option key.
        second: &'static str,
    },

    /// A license destination is configured but no license artifact is attached.
    #[error("license artifact not attached (destination '{dest}')")]
    LicenseNotAttached {
        /// Configured in-workload destination path.
        dest: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for diagnostics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::UnknownOption { .. } => "config_unknown_option",
            ConfigError::InvalidValue { .. } => "config_invalid_value",
            ConfigError::InvalidLogLevel { .. } => "config_invalid_log_level",
            ConfigError::MutuallyExclusive { .. } => "config_mutually_exclusive",
            ConfigError::LicenseNotAttached { .. } => "config_license_not_attached",
        }
    }

    /// Returns the single-line message used for the `Blocked` status.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
