use serde::Deserialize;
use serde::Serialize;

use crate::core::pod::PodSpec;
use crate::{Crd, CrdNames, DefaultHeader, LabelSelector, Spec, Status, TemplateSpec};

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct JobSpec {
    pub template: TemplateSpec<PodSpec>,
    pub backoff_limit: Option<usize>,
    pub active_deadline_seconds: Option<usize>,
    pub parallelism: Option<usize>,
    pub completions: Option<usize>,
    pub completion_mode: Option<CompletionMode>,
    pub suspend: Option<bool>,
    pub selector: Option<LabelSelector>,
    pub manual_selector: Option<bool>,
    pub ttl_seconds_after_finished: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum CompletionMode {
    Indexed,
    NonIndexed,
}

impl Spec for JobSpec {
    type Status = JobStatus;
    type Header = DefaultHeader;

    fn metadata() -> &'static Crd {
        &API
    }
}

const API: Crd = Crd {
    group: "batch",
    version: "v1",
    names: CrdNames {
        kind: "Job",
        plural: "jobs",
        singular: "job",
    },
};

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct JobStatus {
    pub active: usize,
    pub completion_time: Option<String>,
    pub failed: usize,
    pub start_time: Option<String>,
    pub succeeded: usize,
}

impl Status for JobStatus {}
