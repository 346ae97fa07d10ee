//!
//! # ServiceMonitor
//!
//! Prometheus operator resource describing how to scrape the endpoints of a set of services
//!
use serde::Deserialize;
use serde::Serialize;

use crate::{Crd, CrdNames, DefaultHeader, LabelSelector, Spec, Status};

const SERVICE_MONITOR_API: Crd = Crd {
    group: "monitoring.coreos.com",
    version: "v1",
    names: CrdNames {
        kind: "ServiceMonitor",
        plural: "servicemonitors",
        singular: "servicemonitor",
    },
};

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceMonitorSpec {
    pub endpoints: Vec<Endpoint>,
    pub namespace_selector: NamespaceSelector,
    pub selector: LabelSelector,
    pub job_label: Option<String>,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoint {
    pub port: Option<String>,
    pub path: Option<String>,
    pub scheme: Option<String>,
    pub interval: Option<String>,
    pub scrape_timeout: Option<String>,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceSelector {
    pub any: Option<bool>,
    pub match_names: Vec<String>,
}

impl Spec for ServiceMonitorSpec {
    type Status = ServiceMonitorStatus;
    type Header = DefaultHeader;

    fn metadata() -> &'static Crd {
        &SERVICE_MONITOR_API
    }
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ServiceMonitorStatus {}

impl Status for ServiceMonitorStatus {}

#[cfg(test)]
mod test {

    use crate::Spec;

    use super::Endpoint;
    use super::ServiceMonitorSpec;

    #[test]
    fn test_service_monitor_api() {
        assert_eq!(
            ServiceMonitorSpec::api_version(),
            "monitoring.coreos.com/v1"
        );
    }

    #[test]
    fn test_endpoint_serialization() {
        let endpoint = Endpoint {
            path: Some("/metrics".to_owned()),
            scrape_timeout: Some("30s".to_owned()),
            ..Default::default()
        };

        let value = serde_json::to_value(&endpoint).expect("json");
        assert_eq!(value["scrapeTimeout"], serde_json::json!("30s"));
        assert_eq!(value["path"], serde_json::json!("/metrics"));
    }
}
