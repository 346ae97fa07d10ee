use std::collections::HashMap;

use k8_types::core::service::{LoadBalancerType, ServicePort, ServiceSpec};
use k8_types::{InputK8Obj, InputObjectMeta, Spec};

use crate::BuildError;

use super::{check_identity, MetaBuilder};

/// single port service
#[derive(Debug, Clone)]
pub struct ServiceBuilder {
    pub metadata: InputObjectMeta,
    pub selector: HashMap<String, String>,
    pub service_type: LoadBalancerType,
    /// `None` as value makes the service headless
    pub cluster_ip: Option<String>,
    pub port: u16,
    pub port_name: Option<String>,
    pub publish_not_ready_addresses: bool,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self {
            metadata: InputObjectMeta::default(),
            selector: HashMap::new(),
            service_type: LoadBalancerType::ClusterIP,
            cluster_ip: None,
            port: 0,
            port_name: None,
            publish_not_ready_addresses: false,
        }
    }
}

impl MetaBuilder for ServiceBuilder {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta {
        &mut self.metadata
    }
}

impl ServiceBuilder {
    pub fn new<T: Into<String>>(name: T, namespace: T) -> Self {
        Self {
            metadata: InputObjectMeta::named(name, namespace),
            ..Default::default()
        }
    }

    pub fn set_selector(mut self, selector: HashMap<String, String>) -> Self {
        self.selector = selector;
        self
    }

    pub fn set_service_type(mut self, service_type: LoadBalancerType) -> Self {
        self.service_type = service_type;
        self
    }

    pub fn set_cluster_ip<T: Into<String>>(mut self, cluster_ip: T) -> Self {
        self.cluster_ip = Some(cluster_ip.into());
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn set_port_name<T: Into<String>>(mut self, name: T) -> Self {
        self.port_name = Some(name.into());
        self
    }

    pub fn set_publish_not_ready_addresses(mut self, publish: bool) -> Self {
        self.publish_not_ready_addresses = publish;
        self
    }

    pub fn build(self) -> Result<InputK8Obj<ServiceSpec>, BuildError> {
        check_identity::<ServiceSpec>(&self.metadata)?;
        if self.port == 0 {
            return Err(BuildError::MissingField {
                kind: ServiceSpec::label(),
                field: "port",
            });
        }

        let spec = ServiceSpec {
            r#type: Some(self.service_type),
            cluster_ip: self.cluster_ip,
            ports: vec![ServicePort {
                name: self.port_name,
                port: self.port,
                ..Default::default()
            }],
            publish_not_ready_addresses: Some(self.publish_not_ready_addresses),
            selector: Some(self.selector),
            ..Default::default()
        };

        Ok(InputK8Obj::new(spec, self.metadata))
    }
}

#[cfg(test)]
mod test {

    use k8_types::core::service::{LoadBalancerType, ServiceSpec};
    use k8_types::Spec;

    use super::ServiceBuilder;
    use crate::builder::app_label;
    use crate::BuildError;

    #[test]
    fn test_headless_service() {
        let service = ServiceBuilder::new("rs0-exporter-svc", "ns1")
            .set_selector(app_label("rs0-exporter"))
            .set_cluster_ip("None")
            .set_port(9216)
            .set_port_name("metrics")
            .set_publish_not_ready_addresses(true)
            .build()
            .expect("build");

        assert_eq!(service.api_version, "v1");
        assert_eq!(service.spec.r#type, Some(LoadBalancerType::ClusterIP));
        assert_eq!(service.spec.cluster_ip, Some("None".to_owned()));
        assert_eq!(service.spec.ports[0].port, 9216);
        assert_eq!(service.spec.ports[0].name, Some("metrics".to_owned()));
        assert_eq!(service.spec.publish_not_ready_addresses, Some(true));
    }

    #[test]
    fn test_port_required() {
        let err = ServiceBuilder::new("rs0-exporter-svc", "ns1")
            .build()
            .expect_err("no port");
        assert_eq!(
            err,
            BuildError::MissingField {
                kind: ServiceSpec::label(),
                field: "port"
            }
        );
    }
}
