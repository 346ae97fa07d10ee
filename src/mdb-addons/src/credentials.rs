//!
//! # Database credentials
//!
//! Passwords of the users declared on the custom resource live in secrets
//! referenced by each user.  Add-ons read them to build connection strings.
//!
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

use k8_apply::{ApplyError, ClientError, ItemGetter};
use k8_types::core::secret::SecretSpec;
use k8_types::{ItemMeta, K8Obj};

use crate::config::AddonConfig;
use crate::resource::{MongoDbObj, MongoDbSpec, MongoDbUser};
use crate::AddonError;

pub const MONGODB_PORT: u16 = 27017;

/// key holding the connection string in add-on secrets
pub const URI_KEY: &str = "mongodb-uri";

/// characters escaped in the user info part of the uri
const USERINFO: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// look up `username` on the resource
pub fn find_user<'a, E>(
    mdb: &'a K8Obj<MongoDbSpec>,
    username: &str,
) -> Result<&'a MongoDbUser, AddonError<E>>
where
    E: ClientError,
{
    mdb.user(username)
        .ok_or_else(|| AddonError::UserNotDeclared {
            resource: mdb.metadata.name.clone(),
            user: username.to_owned(),
        })
}

/// read and decode password of `username` from its password secret
pub async fn read_user_password<C>(
    client: &C,
    mdb: &K8Obj<MongoDbSpec>,
    username: &str,
) -> Result<String, AddonError<C::Error>>
where
    C: ItemGetter<SecretSpec>,
{
    let user = find_user::<C::Error>(mdb, username)?;
    let secret_ref = &user.password_secret_ref;
    let item = ItemMeta::new(secret_ref.name.as_str(), mdb.metadata.namespace.as_str());
    debug!("reading password of '{}' from secret '{}'", username, item);

    let secret = client
        .retrieve_item(&item)
        .await
        .map_err(|err| ApplyError::client::<SecretSpec, _>(&item, err))?;

    let encoded = match secret.header.data.get(&secret_ref.key) {
        Some(encoded) => encoded,
        None => {
            return Err(AddonError::MissingPasswordKey {
                secret: secret_ref.name.clone(),
                key: secret_ref.key.clone(),
            })
        }
    };

    let invalid = |reason: String| -> AddonError<C::Error> {
        AddonError::InvalidPassword {
            secret: secret_ref.name.clone(),
            key: secret_ref.key.clone(),
            reason,
        }
    };
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| invalid(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| invalid(err.to_string()))
}

/// connection string of `username`, password read from the cluster
pub async fn user_connection_string<C>(
    client: &C,
    mdb: &K8Obj<MongoDbSpec>,
    username: &str,
    config: &AddonConfig,
) -> Result<String, AddonError<C::Error>>
where
    C: ItemGetter<SecretSpec>,
{
    let user = find_user::<C::Error>(mdb, username)?;
    let password = read_user_password(client, mdb, username).await?;
    Ok(connection_string(mdb, user, &password, config))
}

/// uri reaching the replica set through its service, user name and password percent-encoded
pub fn connection_string(
    mdb: &K8Obj<MongoDbSpec>,
    user: &MongoDbUser,
    password: &str,
    config: &AddonConfig,
) -> String {
    format!(
        "mongodb://{}:{}@{}.{}.svc.{}:{}/?authSource={}&replicaSet={}",
        utf8_percent_encode(&user.name, USERINFO),
        utf8_percent_encode(password, USERINFO),
        mdb.service_name(),
        mdb.metadata.namespace,
        config.cluster_domain,
        MONGODB_PORT,
        user.db,
        mdb.metadata.name
    )
}
