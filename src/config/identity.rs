//! # Workload naming context.
//!
//! [`Identity`] carries the two ambient names the platform assigns to the
//! managed workload: the application name and the model (namespace) it runs
//! in. Both feed into derived values — the supervisor service name, the
//! ingress service-name field, and the default API base path.

/// Ambient naming context for the managed workload.
///
/// ## Example
/// ```
/// use convisor::Identity;
///
/// let id = Identity::new("store", "prod");
/// assert_eq!(id.default_base_path(), "/prod-store");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Application name (also used as the supervisor service name).
    pub app: String,
    /// Model / namespace the workload runs in.
    pub model: String,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(app: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            model: model.into(),
        }
    }

    /// Returns the default API base path, `/{model}-{app}`.
    ///
    /// Used when neither `api-base-path` nor `serve-at-root` is set.
    pub fn default_base_path(&self) -> String {
        format!("/{}-{}", self.model, self.app)
    }
}
