use k8_types::batch::cron_job::{ConcurrencyPolicy, CronJobSpec};
use k8_types::batch::job::JobSpec;
use k8_types::{InputK8Obj, InputObjectMeta, TemplateSpec};

use crate::schedule::backup_schedule;
use crate::BuildError;

use super::{check_identity, MetaBuilder, PodTemplate};

/// cron job, created suspended with `Forbid` concurrency unless told otherwise
#[derive(Debug, Clone)]
pub struct CronJobBuilder {
    pub metadata: InputObjectMeta,
    /// none derives the schedule from the name
    pub schedule: Option<String>,
    pub concurrency_policy: ConcurrencyPolicy,
    pub suspend: bool,
    pub pod_template: PodTemplate,
}

impl Default for CronJobBuilder {
    fn default() -> Self {
        Self {
            metadata: InputObjectMeta::default(),
            schedule: None,
            concurrency_policy: ConcurrencyPolicy::Forbid,
            suspend: true,
            pod_template: PodTemplate::default(),
        }
    }
}

impl MetaBuilder for CronJobBuilder {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta {
        &mut self.metadata
    }
}

impl CronJobBuilder {
    pub fn new<T: Into<String>>(name: T, namespace: T) -> Self {
        Self {
            metadata: InputObjectMeta::named(name, namespace),
            ..Default::default()
        }
    }

    pub fn set_schedule<T: Into<String>>(mut self, schedule: T) -> Self {
        self.schedule = Some(schedule.into());
        self
    }

    pub fn set_concurrency_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.concurrency_policy = policy;
        self
    }

    pub fn set_suspend(mut self, suspend: bool) -> Self {
        self.suspend = suspend;
        self
    }

    pub fn set_pod_template(mut self, template: PodTemplate) -> Self {
        self.pod_template = template;
        self
    }

    pub fn build(self) -> Result<InputK8Obj<CronJobSpec>, BuildError> {
        check_identity::<CronJobSpec>(&self.metadata)?;

        let schedule = self
            .schedule
            .unwrap_or_else(|| backup_schedule(&self.metadata.name));

        let spec = CronJobSpec {
            schedule,
            concurrency_policy: Some(self.concurrency_policy),
            suspend: Some(self.suspend),
            job_template: TemplateSpec::new(JobSpec {
                template: self.pod_template.build(),
                ..Default::default()
            }),
            ..Default::default()
        };

        Ok(InputK8Obj::new(spec, self.metadata))
    }
}
