use tracing::debug;
use tracing::trace;

use k8_types::{InputK8Obj, ItemMeta, K8Obj, Spec};

use crate::merge::{merge, OwnedFields};
use crate::{ApplyError, ClientError, GetCreator, GetUpdateCreator, ItemDeleter};

#[derive(Debug)]
pub enum ApplyResult<S>
where
    S: Spec,
{
    /// nothing was written
    None,
    Created(K8Obj<S>),
    Updated(K8Obj<S>),
}

impl<S> ApplyResult<S>
where
    S: Spec,
{
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// reject object without name or namespace before talking to the cluster
fn check_identity<S, E>(desired: &InputK8Obj<S>) -> Result<ItemMeta, ApplyError<E>>
where
    S: Spec,
    E: ClientError,
{
    if desired.metadata.name.is_empty() {
        return Err(ApplyError::MissingIdentity {
            kind: S::label(),
            field: "name",
        });
    }
    if desired.metadata.namespace.is_empty() {
        return Err(ApplyError::MissingIdentity {
            kind: S::label(),
            field: "namespace",
        });
    }
    Ok(desired.metadata.as_item())
}

/// create object, an "already exists" answer means another reconciler won the race
async fn create<C, S>(client: &C, desired: InputK8Obj<S>) -> Result<ApplyResult<S>, ApplyError<C::Error>>
where
    C: GetCreator<S>,
    S: Spec,
{
    let item = desired.metadata.as_item();
    debug!("{}: item '{}' not found, creating ...", S::label(), item);
    match client.create_item(desired).await {
        Ok(created) => Ok(ApplyResult::Created(created)),
        Err(err) if err.already_exists() => {
            debug!(
                "{}: '{}' already exists... moving forward: {}",
                S::label(),
                item,
                err
            );
            Ok(ApplyResult::None)
        }
        Err(err) => Err(ApplyError::client::<S, _>(&item, err)),
    }
}

/// make sure object exists, existing object is left untouched.
/// used for kinds that are never updated by this operator
pub async fn ensure_exists<C, S>(
    client: &C,
    desired: InputK8Obj<S>,
) -> Result<ApplyResult<S>, ApplyError<C::Error>>
where
    C: GetCreator<S>,
    S: Spec,
{
    let item = check_identity(&desired)?;
    debug!("{}: ensuring '{}' exists", S::label(), item);
    trace!("{}: desired {:#?}", S::label(), desired);

    match client.retrieve_item(&item).await {
        Ok(_) => {
            debug!("{}: '{}' exists, leaving as is", S::label(), item);
            Ok(ApplyResult::None)
        }
        Err(err) if err.not_found() => create(client, desired).await,
        Err(err) => Err(ApplyError::client::<S, _>(&item, err)),
    }
}

/// create object if it doesn't exist, otherwise merge owned fields into the
/// live object and write it back with the live resource version.
/// if merge doesn't change anything, no update is sent
pub async fn create_or_update<C, S>(
    client: &C,
    desired: InputK8Obj<S>,
) -> Result<ApplyResult<S>, ApplyError<C::Error>>
where
    C: GetUpdateCreator<S>,
    S: OwnedFields,
{
    let item = check_identity(&desired)?;
    debug!("{}: applying '{}' changes", S::label(), item);
    trace!("{}: applying {:#?}", S::label(), desired);

    let live = match client.retrieve_item(&item).await {
        Ok(live) => live,
        Err(err) if err.not_found() => return create(client, desired).await,
        Err(err) => return Err(ApplyError::client::<S, _>(&item, err)),
    };

    let merged = merge(live.clone(), &desired);
    if merged.metadata == live.metadata && merged.spec == live.spec {
        debug!("{}: no change detected for '{}', doing nothing", S::label(), item);
        return Ok(ApplyResult::None);
    }

    debug!("{}: updating '{}'", S::label(), item);
    trace!("{}: old spec: {:#?}", S::label(), live.spec);
    trace!("{}: new spec: {:#?}", S::label(), merged.spec);
    let updated = client
        .update_item(merged.as_update())
        .await
        .map_err(|err| ApplyError::client::<S, _>(&item, err))?;
    Ok(ApplyResult::Updated(updated))
}

/// delete object, returns false if it was already gone
pub async fn ensure_absent<C, S>(client: &C, item: &ItemMeta) -> Result<bool, ApplyError<C::Error>>
where
    C: ItemDeleter<S>,
    S: Spec,
{
    debug!("{}: deleting '{}'", S::label(), item);
    match client.delete_item(item).await {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => {
            debug!("{}: '{}' not found, nothing to delete", S::label(), item);
            Ok(false)
        }
        Err(err) => Err(ApplyError::client::<S, _>(item, err)),
    }
}
