use thiserror::Error;

use k8_types::{K8Meta, Spec};

use crate::ClientError;

#[derive(Error, Debug)]
pub enum ApplyError<E>
where
    E: ClientError,
{
    #[error("{kind}: desired object has no {field}")]
    MissingIdentity {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{kind} '{namespace}/{name}': {source}")]
    Client {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: E,
    },
}

impl<E> ApplyError<E>
where
    E: ClientError,
{
    /// wrap client error with kind and identity of the object
    pub fn client<S, M>(metadata: &M, source: E) -> Self
    where
        S: Spec,
        M: K8Meta,
    {
        Self::Client {
            kind: S::label(),
            namespace: metadata.namespace().to_owned(),
            name: metadata.name().to_owned(),
            source,
        }
    }

    /// underlying client error, if any
    pub fn client_error(&self) -> Option<&E> {
        match self {
            Self::Client { source, .. } => Some(source),
            Self::MissingIdentity { .. } => None,
        }
    }
}
