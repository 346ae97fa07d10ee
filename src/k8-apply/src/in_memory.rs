//!
//! # In memory client
//!
//! Implements every capability against a map of json values.  Behaves like the api server
//! for the parts this crate relies on: create rejects existing objects, update rejects stale
//! resource versions, get and delete report missing objects.
//!
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use k8_types::{Crd, InputK8Obj, ItemMeta, K8Meta, K8Obj, ObjectMeta, Spec, UpdatedK8Obj};

use crate::{ClientError, ItemClient, ItemCreator, ItemDeleter, ItemGetter, ItemUpdater};

#[derive(Error, Debug)]
pub enum InMemoryError {
    #[error("json: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("lock poison error")]
    LockPoisonError,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("conflict on {name}: resource version {found} doesn't match {expected}")]
    Conflict {
        name: String,
        found: String,
        expected: String,
    },
}

impl ClientError for InMemoryError {
    fn not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    fn already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ItemKey {
    crd: &'static Crd,
    ns: String,
    name: String,
}

impl ItemKey {
    fn new<S>(metadata: &dyn K8Meta) -> Self
    where
        S: Spec,
    {
        ItemKey {
            crd: S::metadata(),
            ns: metadata.namespace().to_owned(),
            name: metadata.name().to_owned(),
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}/{}", self.crd.names.kind, self.ns, self.name)
    }
}

/// number of calls per operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCount {
    pub retrieve: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCount {
    /// calls which changed the store
    pub fn mutations(&self) -> usize {
        self.create + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct Store {
    items: HashMap<ItemKey, Value>,
    version: u64,
    calls: CallCount,
}

impl Store {
    fn next_version(&mut self) -> String {
        self.version += 1;
        self.version.to_string()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryClient {
    store: RwLock<Store>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, InMemoryError> {
        self.store.read().map_err(|_| InMemoryError::LockPoisonError)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, InMemoryError> {
        self.store.write().map_err(|_| InMemoryError::LockPoisonError)
    }

    /// calls made so far
    pub fn calls(&self) -> Result<CallCount, InMemoryError> {
        Ok(self.read()?.calls)
    }

    /// forget recorded calls, stored objects are kept
    pub fn reset_calls(&self) -> Result<(), InMemoryError> {
        self.write()?.calls = CallCount::default();
        Ok(())
    }

    /// number of stored objects of kind `S`
    pub fn count<S: Spec>(&self) -> Result<usize, InMemoryError> {
        let store = self.read()?;
        Ok(store
            .items
            .keys()
            .filter(|key| key.crd == S::metadata())
            .count())
    }
}

impl ItemClient for InMemoryClient {
    type Error = InMemoryError;
}

#[async_trait]
impl<S> ItemGetter<S> for InMemoryClient
where
    S: Spec,
{
    async fn retrieve_item(&self, metadata: &ItemMeta) -> Result<K8Obj<S>, InMemoryError> {
        let mut store = self.write()?;
        store.calls.retrieve += 1;
        let item_key = ItemKey::new::<S>(metadata);
        let item_value = store
            .items
            .get(&item_key)
            .ok_or_else(|| InMemoryError::NotFound(item_key.to_string()))?;
        Ok(serde_json::from_value(item_value.clone())?)
    }
}

#[async_trait]
impl<S> ItemCreator<S> for InMemoryClient
where
    S: Spec,
{
    async fn create_item(&self, value: InputK8Obj<S>) -> Result<K8Obj<S>, InMemoryError> {
        let mut store = self.write()?;
        store.calls.create += 1;
        let item_key = ItemKey::new::<S>(&value.metadata);
        if store.items.contains_key(&item_key) {
            return Err(InMemoryError::AlreadyExists(item_key.to_string()));
        }

        let resource_version = store.next_version();
        let k8_obj: K8Obj<S> = K8Obj {
            api_version: value.api_version,
            kind: value.kind,
            metadata: ObjectMeta {
                name: value.metadata.name,
                namespace: value.metadata.namespace,
                uid: format!("uid-{}", resource_version),
                labels: value.metadata.labels,
                annotations: value.metadata.annotations,
                owner_references: value.metadata.owner_references,
                finalizers: value.metadata.finalizers,
                generation: Some(1),
                resource_version,
                ..Default::default()
            },
            spec: value.spec,
            header: value.header,
            status: S::Status::default(),
        };

        trace!("created {}", item_key);
        store.items.insert(item_key, serde_json::to_value(&k8_obj)?);
        Ok(k8_obj)
    }
}

#[async_trait]
impl<S> ItemUpdater<S> for InMemoryClient
where
    S: Spec,
{
    async fn update_item(&self, value: UpdatedK8Obj<S>) -> Result<K8Obj<S>, InMemoryError> {
        let mut store = self.write()?;
        store.calls.update += 1;
        let item_key = ItemKey::new::<S>(&value.metadata);
        let item_value = store
            .items
            .get(&item_key)
            .ok_or_else(|| InMemoryError::NotFound(item_key.to_string()))?;
        let mut k8_obj: K8Obj<S> = serde_json::from_value(item_value.clone())?;

        if k8_obj.metadata.resource_version != value.metadata.resource_version {
            return Err(InMemoryError::Conflict {
                name: item_key.to_string(),
                found: value.metadata.resource_version,
                expected: k8_obj.metadata.resource_version,
            });
        }

        k8_obj.metadata.labels = value.metadata.labels;
        k8_obj.metadata.annotations = value.metadata.annotations;
        k8_obj.metadata.owner_references = value.metadata.owner_references;
        k8_obj.metadata.finalizers = value.metadata.finalizers;
        k8_obj.metadata.generation = k8_obj.metadata.generation.map(|generation| generation + 1);
        k8_obj.metadata.resource_version = store.next_version();
        k8_obj.spec = value.spec;
        k8_obj.header = value.header;

        trace!("updated {}", item_key);
        store.items.insert(item_key, serde_json::to_value(&k8_obj)?);
        Ok(k8_obj)
    }
}

#[async_trait]
impl<S> ItemDeleter<S> for InMemoryClient
where
    S: Spec,
{
    async fn delete_item(&self, metadata: &ItemMeta) -> Result<(), InMemoryError> {
        let mut store = self.write()?;
        store.calls.delete += 1;
        let item_key = ItemKey::new::<S>(metadata);
        store
            .items
            .remove(&item_key)
            .ok_or_else(|| InMemoryError::NotFound(item_key.to_string()))?;
        trace!("deleted {}", item_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use std::collections::HashMap;

    use fluvio_future::test_async;
    use rand::distributions::Alphanumeric;
    use rand::{thread_rng, Rng};

    use k8_types::core::service::ServicePort;
    use k8_types::core::service::ServiceSpec;
    use k8_types::{InputK8Obj, InputObjectMeta, Spec};

    use crate::{ClientError, ItemCreator, ItemDeleter, ItemGetter, ItemUpdater};

    use super::InMemoryClient;
    use super::InMemoryError;

    const SPU_DEFAULT_NAME: &str = "spu";

    fn new_service() -> InputK8Obj<ServiceSpec> {
        let rng = thread_rng();
        let rname: String = rng
            .sample_iter(&Alphanumeric)
            .take(5)
            .map(char::from)
            .collect();
        let name = format!("test{}", rname);

        let mut labels = HashMap::new();
        labels.insert("app".to_owned(), SPU_DEFAULT_NAME.to_owned());
        let mut selector = HashMap::new();
        selector.insert("app".to_owned(), SPU_DEFAULT_NAME.to_owned());

        let service_spec = ServiceSpec {
            cluster_ip: Some("None".to_owned()),
            ports: vec![ServicePort {
                port: 9092,
                ..Default::default()
            }],
            selector: Some(selector),
            ..Default::default()
        };

        InputK8Obj {
            api_version: ServiceSpec::api_version(),
            kind: ServiceSpec::kind(),
            metadata: InputObjectMeta {
                name: name.to_lowercase(),
                labels,
                namespace: "default".to_owned(),
                ..Default::default()
            },
            spec: service_spec,
            ..Default::default()
        }
    }

    #[test_async]
    async fn test_create_and_retrieve_service() -> Result<(), InMemoryError> {
        let new_item = new_service();
        let item_meta = new_item.metadata.as_item();

        let client = InMemoryClient::new();
        let item = client.create_item(new_item).await?;
        assert!(!item.metadata.resource_version.is_empty());

        let retrieved = ItemGetter::<ServiceSpec>::retrieve_item(&client, &item_meta).await?;

        assert_eq!(retrieved.metadata, item.metadata);
        assert_eq!(retrieved.spec, item.spec);
        Ok(())
    }

    #[test_async]
    async fn test_create_twice_already_exists() -> Result<(), InMemoryError> {
        let new_item = new_service();

        let client = InMemoryClient::new();
        client.create_item(new_item.clone()).await?;
        let err = client
            .create_item(new_item)
            .await
            .expect_err("second create");
        assert!(err.already_exists());
        Ok(())
    }

    #[test_async]
    async fn test_stale_update_conflicts() -> Result<(), InMemoryError> {
        let client = InMemoryClient::new();
        let item = client.create_item(new_service()).await?;

        let mut first = item.as_update();
        first.spec.publish_not_ready_addresses = Some(true);
        let updated = client.update_item(first).await?;
        assert_ne!(updated.metadata.resource_version, item.metadata.resource_version);

        // second writer still holds the old version
        let err = client
            .update_item(item.as_update())
            .await
            .expect_err("conflict");
        assert!(matches!(err, InMemoryError::Conflict { .. }));
        Ok(())
    }

    #[test_async]
    async fn test_create_and_delete_service() -> Result<(), InMemoryError> {
        let new_item = new_service();
        let item_meta = new_item.metadata.as_item();

        let client = InMemoryClient::new();
        client.create_item(new_item).await?;
        ItemDeleter::<ServiceSpec>::delete_item(&client, &item_meta).await?;

        let err = ItemGetter::<ServiceSpec>::retrieve_item(&client, &item_meta)
            .await
            .expect_err("deleted");
        assert!(err.not_found());
        assert_eq!(client.count::<ServiceSpec>()?, 0);
        Ok(())
    }
}
