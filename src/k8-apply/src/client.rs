use std::error::Error;

use async_trait::async_trait;

use k8_types::{InputK8Obj, ItemMeta, K8Obj, Spec, UpdatedK8Obj};

/// error returned by a cluster client
pub trait ClientError: Error + Send + Sync + 'static {
    /// object does not exist
    fn not_found(&self) -> bool;

    /// object already exists, returned on create
    fn already_exists(&self) -> bool;
}

/// base of every capability, fixes the error type of the client
pub trait ItemClient: Send + Sync {
    type Error: ClientError;
}

#[async_trait]
pub trait ItemGetter<S>: ItemClient
where
    S: Spec,
{
    /// retrieve a single item
    async fn retrieve_item(&self, metadata: &ItemMeta) -> Result<K8Obj<S>, Self::Error>;
}

#[async_trait]
pub trait ItemCreator<S>: ItemClient
where
    S: Spec,
{
    /// create new object
    async fn create_item(&self, value: InputK8Obj<S>) -> Result<K8Obj<S>, Self::Error>;
}

#[async_trait]
pub trait ItemUpdater<S>: ItemClient
where
    S: Spec,
{
    /// replace existing object, resource version of `value` must match the stored one
    async fn update_item(&self, value: UpdatedK8Obj<S>) -> Result<K8Obj<S>, Self::Error>;
}

#[async_trait]
pub trait ItemDeleter<S>: ItemClient
where
    S: Spec,
{
    async fn delete_item(&self, metadata: &ItemMeta) -> Result<(), Self::Error>;
}

/// capabilities of a create-only kind
pub trait GetCreator<S: Spec>: ItemGetter<S> + ItemCreator<S> {}

impl<S, C> GetCreator<S> for C
where
    S: Spec,
    C: ItemGetter<S> + ItemCreator<S>,
{
}

/// capabilities of a kind that is updated in place
pub trait GetUpdateCreator<S: Spec>: ItemGetter<S> + ItemUpdater<S> + ItemCreator<S> {}

impl<S, C> GetUpdateCreator<S> for C
where
    S: Spec,
    C: ItemGetter<S> + ItemUpdater<S> + ItemCreator<S>,
{
}

/// capabilities of a kind that is also torn down
pub trait GetUpdateCreateDeleter<S: Spec>: GetUpdateCreator<S> + ItemDeleter<S> {}

impl<S, C> GetUpdateCreateDeleter<S> for C
where
    S: Spec,
    C: GetUpdateCreator<S> + ItemDeleter<S>,
{
}
