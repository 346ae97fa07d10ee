use serde::Deserialize;
use serde::Serialize;

use super::job::JobSpec;
use crate::{Crd, CrdNames, DefaultHeader, Spec, Status, TemplateSpec};

const CRON_JOB_API: Crd = Crd {
    group: "batch",
    version: "v1",
    names: CrdNames {
        kind: "CronJob",
        plural: "cronjobs",
        singular: "cronjob",
    },
};

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CronJobSpec {
    pub schedule: String,
    pub time_zone: Option<String>,
    pub concurrency_policy: Option<ConcurrencyPolicy>,
    pub suspend: Option<bool>,
    pub job_template: TemplateSpec<JobSpec>,
    pub starting_deadline_seconds: Option<i64>,
    pub successful_jobs_history_limit: Option<i32>,
    pub failed_jobs_history_limit: Option<i32>,
}

/// how to treat concurrent executions of a job created by the cron job
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    Allow,
    Forbid,
    Replace,
}

impl Default for ConcurrencyPolicy {
    fn default() -> Self {
        Self::Allow // https://kubernetes.io/docs/concepts/workloads/controllers/cron-jobs/#concurrency-policy
    }
}

impl Spec for CronJobSpec {
    type Status = CronJobStatus;
    type Header = DefaultHeader;

    fn metadata() -> &'static Crd {
        &CRON_JOB_API
    }
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct CronJobStatus {
    pub last_schedule_time: Option<String>,
    pub last_successful_time: Option<String>,
}

impl Status for CronJobStatus {}

#[cfg(test)]
mod test {

    use crate::Spec;

    use super::ConcurrencyPolicy;
    use super::CronJobSpec;

    #[test]
    fn test_cron_job_api() {
        assert_eq!(CronJobSpec::api_version(), "batch/v1");
        assert_eq!(CronJobSpec::kind(), "CronJob");
    }

    #[test]
    fn test_cron_job_serialization() {
        let spec = CronJobSpec {
            schedule: "0 11,23 * * *".to_owned(),
            concurrency_policy: Some(ConcurrencyPolicy::Forbid),
            suspend: Some(true),
            ..Default::default()
        };

        let value = serde_json::to_value(&spec).expect("json");
        assert_eq!(value["schedule"], serde_json::json!("0 11,23 * * *"));
        assert_eq!(value["concurrencyPolicy"], serde_json::json!("Forbid"));
        assert_eq!(value["suspend"], serde_json::json!(true));
        assert!(value["jobTemplate"]["spec"]["template"].is_object());
    }
}
