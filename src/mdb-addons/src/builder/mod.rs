//!
//! # Object builders
//!
//! One builder per kind.  A builder holds every attribute of the object with a default,
//! `build` assembles the desired object and consumes the builder.
//! Builders never talk to the cluster; name and namespace are checked here so a bad
//! object fails before any call is made.
//!
mod cron_job;
mod deployment;
mod pod;
mod secret;
mod service;
mod service_account;
mod service_monitor;

use std::collections::HashMap;

use k8_types::{InputObjectMeta, OwnerReferences, Spec};

use crate::BuildError;

pub use self::cron_job::CronJobBuilder;
pub use self::deployment::DeploymentBuilder;
pub use self::pod::PodTemplate;
pub use self::secret::SecretBuilder;
pub use self::service::ServiceBuilder;
pub use self::service_account::ServiceAccountBuilder;
pub use self::service_monitor::ServiceMonitorBuilder;

/// setters for object identity shared by all builders
pub trait MetaBuilder: Sized {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta;

    fn set_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.metadata_mut().labels = labels;
        self
    }

    fn set_annotations(mut self, annotations: HashMap<String, String>) -> Self {
        self.metadata_mut().annotations = annotations;
        self
    }

    fn set_owner(mut self, owner: OwnerReferences) -> Self {
        self.metadata_mut().owner_references.push(owner);
        self
    }
}

/// name and namespace must be set
fn check_identity<S: Spec>(metadata: &InputObjectMeta) -> Result<(), BuildError> {
    if metadata.name.is_empty() {
        return Err(BuildError::MissingField {
            kind: S::label(),
            field: "name",
        });
    }
    if metadata.namespace.is_empty() {
        return Err(BuildError::MissingField {
            kind: S::label(),
            field: "namespace",
        });
    }
    Ok(())
}

/// single label map, used for `app=<name>` selectors
pub fn app_label<T: Into<String>>(app: T) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    labels.insert("app".to_owned(), app.into());
    labels
}
