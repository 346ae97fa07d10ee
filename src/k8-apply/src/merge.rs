//!
//! # Spec merge
//!
//! Copies the fields this operator owns from a desired object into the live one.
//! Labels and annotations are merged key by key, desired wins on collision.
//! Spec fields are copied only if listed by the kind's [`OwnedFields`] impl,
//! everything else on the live object is kept as is.
//!
use k8_types::app::deployment::DeploymentSpec;
use k8_types::batch::cron_job::CronJobSpec;
use k8_types::core::service::ServiceSpec;
use k8_types::{InputK8Obj, K8Obj, Spec};

/// kind which can be updated in place
pub trait OwnedFields: Spec + PartialEq {
    /// overwrite owned fields of `self` (live spec) with those of `desired`
    fn merge_owned(&mut self, desired: &Self);
}

/// merge `desired` into `live` and return the result
pub fn merge<S>(mut live: K8Obj<S>, desired: &InputK8Obj<S>) -> K8Obj<S>
where
    S: OwnedFields,
{
    for (key, value) in &desired.metadata.labels {
        live.metadata.labels.insert(key.clone(), value.clone());
    }

    for (key, value) in &desired.metadata.annotations {
        live.metadata.annotations.insert(key.clone(), value.clone());
    }

    live.spec.merge_owned(&desired.spec);
    live
}

/// owned: `type`
impl OwnedFields for ServiceSpec {
    fn merge_owned(&mut self, desired: &Self) {
        self.r#type = desired.r#type.clone();
    }
}

/// owned: `replicas`, `template`
impl OwnedFields for DeploymentSpec {
    fn merge_owned(&mut self, desired: &Self) {
        self.replicas = desired.replicas;
        self.template = desired.template.clone();
    }
}

/// owned: `schedule`, `concurrencyPolicy`, `jobTemplate`.
/// `suspend` is left to whoever activates the job
impl OwnedFields for CronJobSpec {
    fn merge_owned(&mut self, desired: &Self) {
        self.schedule = desired.schedule.clone();
        self.concurrency_policy = desired.concurrency_policy.clone();
        self.job_template = desired.job_template.clone();
    }
}
