//! # Typed option schema for the managed workload.
//!
//! [`Options`] is the statically validated form of the platform's flat
//! key/value configuration. The schema is fixed: every key has a declared
//! type, unknown keys are rejected, and mutually exclusive settings fail
//! validation instead of being silently reconciled.
//!
//! ## Schema
//! | Key              | Type   | Default              |
//! |------------------|--------|----------------------|
//! | `port`           | int    | `8383`               |
//! | `log-level`      | enum   | `info`               |
//! | `api-base-path`  | string | `/{model}-{app}`     |
//! | `serve-at-root`  | bool   | `false`              |
//! | `tls`            | bool   | `false`              |
//! | `retention-days` | int    | unset                |
//! | `data-path`      | string | `/var/lib/workload`  |
//! | `license-path`   | string | unset                |
//! | `bucket`         | string | `{app}-replica`      |
//!
//! `serve-at-root` and `api-base-path` are mutually exclusive.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::Identity;
use crate::error::ConfigError;

/// Default data directory inside the workload container.
const DEFAULT_DATA_PATH: &str = "/var/lib/workload";

/// Accepted workload log levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Returns the lowercase name as accepted in options.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Returns the uppercase form used in the workload environment.
    pub fn as_env_value(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidLogLevel { value: s.into() }),
        }
    }
}

/// Statically validated workload options.
///
/// Built from the platform's flat string map via [`Options::from_map`];
/// rebuilt every invocation, never cached across invocations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Workload listening port.
    pub port: u16,
    /// Workload log level.
    pub log_level: LogLevel,
    /// Explicit API base path (normalized), if set.
    pub api_base_path: Option<String>,
    /// Serve at `/` instead of under a base path.
    pub serve_at_root: bool,
    /// TLS toggle for the workload listener.
    pub tls: bool,
    /// Retention window in days, if set.
    pub retention_days: Option<u32>,
    /// Data directory inside the workload container.
    pub data_path: String,
    /// In-workload destination for the license artifact, if licensing is used.
    pub license_path: Option<String>,
    /// Requested replication bucket name, if overridden.
    pub bucket: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            port: 8383,
            log_level: LogLevel::default(),
            api_base_path: None,
            serve_at_root: false,
            tls: false,
            retention_days: None,
            data_path: DEFAULT_DATA_PATH.to_string(),
            license_path: None,
            bucket: None,
        }
    }
}

impl Options {
    /// Parses and validates options from the platform's flat string map.
    ///
    /// Rejects unknown keys and mistyped values; applies defaults for absent
    /// keys; normalizes `api-base-path`; enforces mutual exclusions.
    ///
    /// ## Example
    /// ```
    /// use std::collections::BTreeMap;
    /// use convisor::Options;
    ///
    /// let mut raw = BTreeMap::new();
    /// raw.insert("port".to_string(), "9090".to_string());
    /// raw.insert("tls".to_string(), "true".to_string());
    ///
    /// let opts = Options::from_map(&raw).unwrap();
    /// assert_eq!(opts.port, 9090);
    /// assert!(opts.tls);
    /// ```
    pub fn from_map(raw: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut opts = Options::default();

        for (key, value) in raw {
            match key.as_str() {
                "port" => opts.port = parse_int(key, value)?,
                "log-level" => opts.log_level = value.parse()?,
                "api-base-path" => opts.api_base_path = Some(normalize_base_path(value)),
                "serve-at-root" => opts.serve_at_root = parse_bool(key, value)?,
                "tls" => opts.tls = parse_bool(key, value)?,
                "retention-days" => opts.retention_days = Some(parse_int(key, value)?),
                "data-path" => opts.data_path = value.clone(),
                "license-path" => opts.license_path = Some(value.clone()),
                "bucket" => opts.bucket = Some(value.clone()),
                _ => return Err(ConfigError::UnknownOption { key: key.clone() }),
            }
        }

        if opts.serve_at_root && opts.api_base_path.is_some() {
            return Err(ConfigError::MutuallyExclusive {
                first: "serve-at-root",
                second: "api-base-path",
            });
        }
        if opts.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "port".into(),
                value: "0".into(),
                expected: "port in 1..=65535",
            });
        }

        Ok(opts)
    }

    /// Returns the effective API base path.
    ///
    /// - `serve-at-root` → `/`
    /// - explicit `api-base-path` → its normalized value
    /// - otherwise → `/{model}-{app}`
    pub fn base_path(&self, identity: &Identity) -> String {
        if self.serve_at_root {
            return "/".to_string();
        }
        match &self.api_base_path {
            Some(path) => path.clone(),
            None => identity.default_base_path(),
        }
    }

    /// Returns the requested replication bucket name.
    ///
    /// Defaults to `{app}-replica` when not overridden.
    pub fn bucket_name(&self, identity: &Identity) -> String {
        match &self.bucket {
            Some(name) => name.clone(),
            None => format!("{}-replica", identity.app),
        }
    }
}

/// Adds a leading `/` and strips a trailing `/` (unless the path is just `/`).
fn normalize_base_path(raw: &str) -> String {
    let mut path = if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    };
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            expected: "'true' or 'false'",
        }),
    }
}

fn parse_int<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        value: value.into(),
        expected: "integer",
    })
}
