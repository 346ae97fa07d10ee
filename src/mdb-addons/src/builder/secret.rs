use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use k8_types::core::secret::{SecretHeader, SecretSpec};
use k8_types::{InputK8Obj, InputObjectMeta, TYPE_OPAQUE};

use crate::BuildError;

use super::{check_identity, MetaBuilder};

/// secret with plain text values, encoded on build
#[derive(Debug, Clone)]
pub struct SecretBuilder {
    pub metadata: InputObjectMeta,
    pub data: BTreeMap<String, String>,
    pub ty: String,
}

impl Default for SecretBuilder {
    fn default() -> Self {
        Self {
            metadata: InputObjectMeta::default(),
            data: BTreeMap::new(),
            ty: TYPE_OPAQUE.to_owned(),
        }
    }
}

impl MetaBuilder for SecretBuilder {
    fn metadata_mut(&mut self) -> &mut InputObjectMeta {
        &mut self.metadata
    }
}

impl SecretBuilder {
    pub fn new<T: Into<String>>(name: T, namespace: T) -> Self {
        Self {
            metadata: InputObjectMeta::named(name, namespace),
            ..Default::default()
        }
    }

    pub fn set_field<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<InputK8Obj<SecretSpec>, BuildError> {
        check_identity::<SecretSpec>(&self.metadata)?;

        let header = SecretHeader {
            data: self
                .data
                .into_iter()
                .map(|(key, value)| (key, STANDARD.encode(value)))
                .collect(),
            ty: self.ty,
        };

        Ok(InputK8Obj::new(SecretSpec {}, self.metadata).with_header(header))
    }
}
