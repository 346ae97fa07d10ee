use std::collections::HashMap;

use k8_types::app::deployment::{DeploymentSpec, DeploymentStrategy};
use k8_types::{InputK8Obj, InputObjectMeta, LabelSelector};

use crate::BuildError;

use super::{check_identity, MetaBuilder, PodTemplate};

#[derive(Debug, Clone)]
pub struct DeploymentBuilder {
    pub metadata: InputObjectMeta,
    pub replicas: i32,
    /// empty selects on the object labels
    pub selector: HashMap<String, String>,
    pub pod_template: PodTemplate,
    pub strategy: Option<DeploymentStrategy>,
}

impl Default for DeploymentBuilder {
    fn default() -> Self {
        Self {
            metadata: InputObjectMeta::default(),
            replicas: 1,
            selector: HashMap::new(),
            pod_template: PodTemplate::default(),
            strategy: None,
        }
    }
}

impl MetaBuilder for DeploymentBuilder {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta {
        &mut self.metadata
    }
}

impl DeploymentBuilder {
    pub fn new<T: Into<String>>(name: T, namespace: T) -> Self {
        Self {
            metadata: InputObjectMeta::named(name, namespace),
            ..Default::default()
        }
    }

    pub fn set_replicas(mut self, replicas: i32) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn set_selector(mut self, selector: HashMap<String, String>) -> Self {
        self.selector = selector;
        self
    }

    pub fn set_pod_template(mut self, template: PodTemplate) -> Self {
        self.pod_template = template;
        self
    }

    pub fn set_strategy(mut self, strategy: DeploymentStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<InputK8Obj<DeploymentSpec>, BuildError> {
        check_identity::<DeploymentSpec>(&self.metadata)?;

        let selector = if self.selector.is_empty() {
            self.metadata.labels.clone()
        } else {
            self.selector
        };

        let spec = DeploymentSpec {
            replicas: Some(self.replicas),
            selector: LabelSelector::from(selector),
            strategy: self.strategy,
            template: self.pod_template.build(),
            ..Default::default()
        };

        Ok(InputK8Obj::new(spec, self.metadata))
    }
}

#[cfg(test)]
mod test {

    use super::DeploymentBuilder;
    use crate::builder::{app_label, MetaBuilder, PodTemplate};

    #[test]
    fn test_selector_defaults_to_labels() {
        let deployment = DeploymentBuilder::new("rs0-exporter", "ns1")
            .set_labels(app_label("rs0-exporter"))
            .set_pod_template(PodTemplate::default().set_labels(app_label("rs0-exporter")))
            .build()
            .expect("build");

        assert_eq!(deployment.api_version, "apps/v1");
        assert_eq!(deployment.spec.replicas, Some(1));
        assert_eq!(
            deployment.spec.selector.match_labels.get("app").unwrap(),
            "rs0-exporter"
        );
    }

    #[test]
    fn test_explicit_selector() {
        let deployment = DeploymentBuilder::new("rs0-exporter", "ns1")
            .set_labels(app_label("one"))
            .set_selector(app_label("two"))
            .set_replicas(2)
            .build()
            .expect("build");

        assert_eq!(deployment.spec.replicas, Some(2));
        assert_eq!(deployment.spec.selector.match_labels.get("app").unwrap(), "two");
    }

    #[test]
    fn test_missing_name() {
        assert!(DeploymentBuilder::new("", "ns1").build().is_err());
    }
}
