use std::collections::HashMap;

use k8_types::monitoring::service_monitor::{Endpoint, NamespaceSelector, ServiceMonitorSpec};
use k8_types::{InputK8Obj, InputObjectMeta, LabelSelector};

use crate::BuildError;

use super::{check_identity, MetaBuilder};

/// monitor scraping one endpoint of the services matching `match_labels`
#[derive(Debug, Clone)]
pub struct ServiceMonitorBuilder {
    pub metadata: InputObjectMeta,
    pub path: String,
    /// named service port, none scrapes every port
    pub port: Option<String>,
    pub interval: String,
    pub scrape_timeout: String,
    pub scheme: String,
    /// namespaces of the monitored services
    pub namespaces: Vec<String>,
    pub match_labels: HashMap<String, String>,
}

impl Default for ServiceMonitorBuilder {
    fn default() -> Self {
        Self {
            metadata: InputObjectMeta::default(),
            path: "/metrics".to_owned(),
            port: None,
            interval: "30s".to_owned(),
            scrape_timeout: "30s".to_owned(),
            scheme: "http".to_owned(),
            namespaces: vec![],
            match_labels: HashMap::new(),
        }
    }
}

impl MetaBuilder for ServiceMonitorBuilder {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta {
        &mut self.metadata
    }
}

impl ServiceMonitorBuilder {
    pub fn new<T: Into<String>>(name: T, namespace: T) -> Self {
        Self {
            metadata: InputObjectMeta::named(name, namespace),
            ..Default::default()
        }
    }

    pub fn set_port<T: Into<String>>(mut self, port: T) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn add_namespace<T: Into<String>>(mut self, namespace: T) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    pub fn set_match_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.match_labels = labels;
        self
    }

    pub fn build(self) -> Result<InputK8Obj<ServiceMonitorSpec>, BuildError> {
        check_identity::<ServiceMonitorSpec>(&self.metadata)?;

        let spec = ServiceMonitorSpec {
            endpoints: vec![Endpoint {
                port: self.port,
                path: Some(self.path),
                scheme: Some(self.scheme),
                interval: Some(self.interval),
                scrape_timeout: Some(self.scrape_timeout),
            }],
            namespace_selector: NamespaceSelector {
                any: None,
                match_names: self.namespaces,
            },
            selector: LabelSelector::from(self.match_labels),
            ..Default::default()
        };

        Ok(InputK8Obj::new(spec, self.metadata))
    }
}

#[cfg(test)]
mod test {

    use super::ServiceMonitorBuilder;
    use crate::builder::app_label;

    #[test]
    fn test_endpoint_defaults() {
        let monitor = ServiceMonitorBuilder::new("rs0-exporter", "monitoring")
            .set_port("metrics")
            .add_namespace("ns1")
            .set_match_labels(app_label("rs0-exporter"))
            .build()
            .expect("build");

        assert_eq!(monitor.api_version, "monitoring.coreos.com/v1");
        let endpoint = &monitor.spec.endpoints[0];
        assert_eq!(endpoint.path.as_deref(), Some("/metrics"));
        assert_eq!(endpoint.interval.as_deref(), Some("30s"));
        assert_eq!(endpoint.scrape_timeout.as_deref(), Some("30s"));
        assert_eq!(endpoint.scheme.as_deref(), Some("http"));
        assert_eq!(endpoint.port.as_deref(), Some("metrics"));
        assert_eq!(monitor.spec.namespace_selector.match_names, vec!["ns1".to_owned()]);
    }
}
