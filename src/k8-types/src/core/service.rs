use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;

use crate::Crd;
use crate::CrdNames;
use crate::DefaultHeader;
use crate::Spec;
use crate::Status;

const SERVICE_API: Crd = Crd {
    group: "core",
    version: "v1",
    names: CrdNames {
        kind: "Service",
        plural: "services",
        singular: "service",
    },
};

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSpec {
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    #[serde(rename = "externalIPs")]
    pub external_ips: Vec<String>,
    #[serde(rename = "loadBalancerIP")]
    pub load_balancer_ip: Option<String>,
    pub r#type: Option<LoadBalancerType>,
    pub external_name: Option<String>,
    pub external_traffic_policy: Option<ExternalTrafficPolicy>,
    pub ports: Vec<ServicePort>,
    pub publish_not_ready_addresses: Option<bool>,
    pub selector: Option<HashMap<String, String>>,
}

impl Spec for ServiceSpec {
    type Status = ServiceStatus;
    type Header = DefaultHeader;

    fn metadata() -> &'static Crd {
        &SERVICE_API
    }
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub name: Option<String>,
    pub node_port: Option<u16>,
    pub port: u16,
    pub protocol: Option<String>,
    pub target_port: Option<TargetPort>,
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Clone)]
#[serde(untagged)]
pub enum TargetPort {
    Number(u16),
    Name(String),
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceStatus {
    pub load_balancer: LoadBalancerStatus,
}

impl Status for ServiceStatus {}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Clone)]
pub enum ExternalTrafficPolicy {
    Local,
    Cluster,
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Clone)]
pub enum LoadBalancerType {
    ExternalName,
    #[allow(clippy::upper_case_acronyms)]
    ClusterIP,
    NodePort,
    LoadBalancer,
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadBalancerStatus {
    pub ingress: Vec<LoadBalancerIngress>,
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerIngress {
    pub hostname: Option<String>,
    pub ip: Option<String>,
}

#[cfg(test)]
mod test {

    use super::LoadBalancerType;
    use super::ServicePort;
    use super::ServiceSpec;

    #[test]
    fn test_headless_service_serialization() {
        let spec = ServiceSpec {
            cluster_ip: Some("None".to_owned()),
            r#type: Some(LoadBalancerType::ClusterIP),
            ports: vec![ServicePort {
                port: 9216,
                ..Default::default()
            }],
            publish_not_ready_addresses: Some(true),
            ..Default::default()
        };

        let value = serde_json::to_value(&spec).expect("json");
        assert_eq!(value["clusterIP"], serde_json::json!("None"));
        assert_eq!(value["type"], serde_json::json!("ClusterIP"));
        assert_eq!(value["publishNotReadyAddresses"], serde_json::json!(true));
        assert_eq!(value["ports"][0]["port"], serde_json::json!(9216));
    }
}
