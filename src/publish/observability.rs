//! # Observability registrant records.
//!
//! Publishes where to scrape metrics, where logs live, and a dashboard
//! document describing the workload's endpoints. External endpoints are
//! derived from the honored ingress relation when one exists; without
//! ingress the dashboard simply carries no external links, like a workload
//! that is only reachable inside the cluster.

use std::collections::BTreeMap;

use serde_json::json;

use crate::model::fields;
use crate::publish::ingress::{external_api_url, external_ui_url};
use crate::publish::PublishInputs;

/// Builds the observability record:
/// `{metrics-endpoint, scrape-port, dashboard-definition, log-path}`.
pub(super) fn record(inputs: &PublishInputs<'_>) -> Option<BTreeMap<String, String>> {
    let port = inputs.port()?;
    let base_path = inputs.base_path()?;
    let scheme = inputs.scheme();
    let app = &inputs.identity.app;

    let metrics_endpoint = format!(
        "{scheme}://{app}:{port}{}",
        under_base(&base_path, "metrics")
    );

    let mut record = BTreeMap::new();
    record.insert(fields::METRICS_ENDPOINT.into(), metrics_endpoint);
    record.insert(fields::SCRAPE_PORT.into(), port.to_string());
    record.insert(
        fields::DASHBOARD_DEFINITION.into(),
        dashboard(inputs, &base_path),
    );
    if let Some(data_path) = inputs.data_path() {
        record.insert(fields::LOG_PATH.into(), format!("{data_path}/logs"));
    }
    Some(record)
}

/// Dashboard document as a JSON string.
///
/// Serialization goes through `serde_json::Value`, whose object keys are
/// sorted — the same inputs always produce byte-identical output, which the
/// no-op publish check relies on.
fn dashboard(inputs: &PublishInputs<'_>, base_path: &str) -> String {
    let mut endpoints = serde_json::Map::new();
    if let Some(api) = inputs
        .external_url()
        .and_then(|url| external_api_url(&url, base_path))
    {
        endpoints.insert("ui".into(), json!(external_ui_url(&api)));
        endpoints.insert(
            "server-info".into(),
            json!(format!("{}/api/v1/info", api.trim_end_matches('/'))),
        );
        endpoints.insert("api".into(), json!(api));
    }

    json!({
        "name": inputs.identity.app,
        "description": "Stateful store workload managed by convisor",
        "endpoints": endpoints,
    })
    .to_string()
}

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
    use crate::config::{Identity, Options};
    use crate::model::{
        ObservedState, ProcessState, RelationId, RelationRole, RelationSnapshot, StorageStatus,
    };

    fn observed_with_ingress(url: &str) -> ObservedState {
        let mut peer = BTreeMap::new();
        peer.insert("external-url".to_string(), url.to_string());
        ObservedState {
            plan: None,
            process: ProcessState::NotStarted,
            storage: StorageStatus::detached(),
            relations: vec![RelationSnapshot {
                id: RelationId(1),
                role: RelationRole::IngressRequester,
                peer,
                local: BTreeMap::new(),
            }],
            license_digest: None,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_record_with_external_url() {
        let identity = Identity::new("store", "prod");
        let options = Options::default();
        let observed = observed_with_ingress("http://edge.example/prod-store");
        let inputs = PublishInputs {
            identity: &identity,
            options: Some(&options),
            desired: None,
            observed: &observed,
        };

        let record = record(&inputs).unwrap();
        assert_eq!(
            record.get("metrics-endpoint").unwrap(),
            "http://store:8383/prod-store/metrics"
        );
        assert_eq!(record.get("scrape-port").unwrap(), "8383");
        assert_eq!(record.get("log-path").unwrap(), "/var/lib/workload/logs");

        let dashboard: serde_json::Value =
            serde_json::from_str(record.get("dashboard-definition").unwrap()).unwrap();
        assert_eq!(dashboard["name"], "store");
        assert_eq!(
            dashboard["endpoints"]["ui"],
            "http://edge.example/prod-store/ui/dashboard"
        );
        assert_eq!(
            dashboard["endpoints"]["server-info"],
            "http://edge.example/prod-store/api/v1/info"
        );
    }

    #[test]
    fn test_dashboard_without_ingress_has_no_endpoints() {
        let identity = Identity::new("store", "prod");
        let options = Options::default();
        let observed = ObservedState {
            plan: None,
            process: ProcessState::NotStarted,
            storage: StorageStatus::detached(),
            relations: Vec::new(),
            license_digest: None,
            failures: Vec::new(),
        };
        let inputs = PublishInputs {
            identity: &identity,
            options: Some(&options),
            desired: None,
            observed: &observed,
        };

        let record = record(&inputs).unwrap();
        let dashboard: serde_json::Value =
            serde_json::from_str(record.get("dashboard-definition").unwrap()).unwrap();
        assert!(dashboard["endpoints"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_record_is_deterministic() {
        let identity = Identity::new("store", "prod");
        let options = Options::default();
        let observed = observed_with_ingress("http://edge.example/prod-store");
        let inputs = PublishInputs {
            identity: &identity,
            options: Some(&options),
            desired: None,
            observed: &observed,
        };

        assert_eq!(record(&inputs), record(&inputs));
    }
}
