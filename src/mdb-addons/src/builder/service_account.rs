use k8_types::core::service_account::ServiceAccountSpec;
use k8_types::{InputK8Obj, InputObjectMeta};

use crate::BuildError;

use super::{check_identity, MetaBuilder};

#[derive(Debug, Default, Clone)]
pub struct ServiceAccountBuilder {
    pub metadata: InputObjectMeta,
}

impl MetaBuilder for ServiceAccountBuilder {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta {
        &mut self.metadata
    }
}

impl ServiceAccountBuilder {
    pub fn new<T: Into<String>>(name: T, namespace: T) -> Self {
        Self {
            metadata: InputObjectMeta::named(name, namespace),
        }
    }

    pub fn build(self) -> Result<InputK8Obj<ServiceAccountSpec>, BuildError> {
        check_identity::<ServiceAccountSpec>(&self.metadata)?;
        Ok(InputK8Obj::new(ServiceAccountSpec {}, self.metadata))
    }
}
