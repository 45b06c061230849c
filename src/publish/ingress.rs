//! # Ingress requester records and external URL derivation.
//!
//! We tell the ingress which service and port to route to; the ingress tells
//! us the externally reachable URL. The published record is identical for
//! every ingress relation — our identity does not depend on who routes to us.

use std::collections::BTreeMap;

use crate::model::fields;
use crate::publish::PublishInputs;

/// Builds the ingress-requester record: `{service-name, port, strip-prefix}`.
pub(super) fn record(inputs: &PublishInputs<'_>) -> Option<BTreeMap<String, String>> {
    let port = inputs.port()?;
    let strip_prefix = inputs
        .options
        .map(|o| o.serve_at_root)
        .unwrap_or(false);

    let mut record = BTreeMap::new();
    record.insert(fields::SERVICE_NAME.into(), inputs.identity.app.clone());
    record.insert(fields::PORT.into(), port.to_string());
    record.insert(fields::STRIP_PREFIX.into(), strip_prefix.to_string());
    Some(record)
}

/// Returns the `scheme://host[:port]` origin of a URL, without its path.
pub(crate) fn origin_of(url: &str) -> Option<String> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    if rest.is_empty() {
        return None;
    }
    match rest.find('/') {
        Some(slash) => Some(url[..scheme_end + 3 + slash].to_string()),
        None => Some(url.to_string()),
    }
}

/// External API URL: ingress origin + our base path.
pub(crate) fn external_api_url(ingress_url: &str, base_path: &str) -> Option<String> {
    let origin = origin_of(ingress_url)?;
    if base_path == "/" {
        Some(format!("{origin}/"))
    } else {
        Some(format!("{origin}{base_path}"))
    }
}

/// External UI URL: the API URL with the dashboard path appended.
pub(crate) fn external_ui_url(api_url: &str) -> String {
    format!("{}/ui/dashboard", api_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Identity, Options};
    use crate::model::{ObservedState, ProcessState, StorageStatus};

    fn observed() -> ObservedState {
        ObservedState {
            plan: None,
            process: ProcessState::NotStarted,
            storage: StorageStatus::detached(),
            relations: Vec::new(),
            license_digest: None,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_record_fields() {
        let identity = Identity::new("store", "prod");
        let options = Options::default();
        let observed = observed();
        let inputs = PublishInputs {
            identity: &identity,
            options: Some(&options),
            desired: None,
            observed: &observed,
        };

        let record = record(&inputs).unwrap();
        assert_eq!(record.get("service-name").unwrap(), "store");
        assert_eq!(record.get("port").unwrap(), "8383");
        assert_eq!(record.get("strip-prefix").unwrap(), "false");
    }

    #[test]
    fn test_record_needs_a_port() {
        let identity = Identity::new("store", "prod");
        let observed = observed();
        let inputs = PublishInputs {
            identity: &identity,
            options: None,
            desired: None,
            observed: &observed,
        };
        assert!(record(&inputs).is_none(), "no known port, nothing to publish");
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("http://edge.example:8080/prod-store").unwrap(),
            "http://edge.example:8080"
        );
        assert_eq!(
            origin_of("https://edge.example").unwrap(),
            "https://edge.example"
        );
        assert!(origin_of("not-a-url").is_none());
        assert!(origin_of("http://").is_none());
    }

    #[test]
    fn test_external_urls() {
        let api = external_api_url("http://edge:80/ignored/path", "/prod-store").unwrap();
        assert_eq!(api, "http://edge:80/prod-store");
        assert_eq!(external_ui_url(&api), "http://edge:80/prod-store/ui/dashboard");

        let root = external_api_url("http://edge", "/").unwrap();
        assert_eq!(root, "http://edge/");
        assert_eq!(external_ui_url(&root), "http://edge/ui/dashboard");
    }
}
