use thiserror::Error;

use k8_apply::{ApplyError, ClientError};

/// desired object can't be assembled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{kind}: {field} is required")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum AddonError<E>
where
    E: ClientError,
{
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Apply(#[from] ApplyError<E>),
    #[error("user '{user}' is not declared in '{resource}'")]
    UserNotDeclared { resource: String, user: String },
    #[error("secret '{secret}' has no key '{key}'")]
    MissingPasswordKey { secret: String, key: String },
    #[error("secret '{secret}' key '{key}' is not a valid password: {reason}")]
    InvalidPassword {
        secret: String,
        key: String,
        reason: String,
    },
}
