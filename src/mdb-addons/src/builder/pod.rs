use std::collections::HashMap;

use k8_types::core::pod::{ContainerSpec, PodRestartPolicy, PodSpec, VolumeSpec};
use k8_types::{LocalObjectReference, TemplateMeta, TemplateSpec};

/// pod template embedded in deployments and jobs
#[derive(Debug, Default, Clone)]
pub struct PodTemplate {
    pub labels: HashMap<String, String>,
    pub annotations: HashMap<String, String>,
    pub containers: Vec<ContainerSpec>,
    pub volumes: Vec<VolumeSpec>,
    /// none leaves the cluster default
    pub restart_policy: Option<PodRestartPolicy>,
    /// names of registry secrets
    pub image_pull_secrets: Vec<String>,
    pub service_account_name: Option<String>,
}

impl PodTemplate {
    pub fn set_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn add_container(mut self, container: ContainerSpec) -> Self {
        self.containers.push(container);
        self
    }

    pub fn add_volume(mut self, volume: VolumeSpec) -> Self {
        self.volumes.push(volume);
        self
    }

    pub fn set_restart_policy(mut self, policy: PodRestartPolicy) -> Self {
        self.restart_policy = Some(policy);
        self
    }

    pub fn set_image_pull_secrets(mut self, secrets: Vec<String>) -> Self {
        self.image_pull_secrets = secrets;
        self
    }

    pub fn set_service_account<T: Into<String>>(mut self, name: T) -> Self {
        self.service_account_name = Some(name.into());
        self
    }

    pub fn build(self) -> TemplateSpec<PodSpec> {
        let metadata = if self.labels.is_empty() && self.annotations.is_empty() {
            None
        } else {
            Some(TemplateMeta {
                labels: self.labels,
                annotations: self.annotations,
                ..Default::default()
            })
        };

        TemplateSpec {
            metadata,
            spec: PodSpec {
                volumes: self.volumes,
                containers: self.containers,
                restart_policy: self.restart_policy,
                service_account_name: self.service_account_name,
                image_pull_secrets: self
                    .image_pull_secrets
                    .into_iter()
                    .map(|name| LocalObjectReference { name })
                    .collect(),
                ..Default::default()
            },
        }
    }
}
