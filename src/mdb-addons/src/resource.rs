//!
//! # MongoDBCommunity
//!
//! The custom resource owning every add-on object.  Only the fields used to
//! assemble add-ons are modeled, unknown fields are ignored on read.
//!
use serde::Deserialize;
use serde::Serialize;

use k8_types::{Crd, CrdNames, DefaultHeader, K8Obj, OwnerReferences, Spec, Status};

const MONGODB_API: Crd = Crd {
    group: "mongodbcommunity.mongodb.com",
    version: "v1",
    names: CrdNames {
        kind: "MongoDBCommunity",
        plural: "mongodbcommunity",
        singular: "mongodbcommunity",
    },
};

const DEFAULT_PASSWORD_KEY: &str = "password";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MongoDbSpec {
    pub members: i32,
    pub version: String,
    pub service_name: Option<String>,
    pub users: Vec<MongoDbUser>,
}

impl Spec for MongoDbSpec {
    type Status = MongoDbStatus;
    type Header = DefaultHeader;

    fn metadata() -> &'static Crd {
        &MONGODB_API
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MongoDbUser {
    pub name: String,
    pub db: String,
    pub password_secret_ref: SecretKeyReference,
    pub roles: Vec<Role>,
    pub scram_credentials_secret_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeyReference {
    pub name: String,
    #[serde(default = "default_password_key")]
    pub key: String,
}

impl Default for SecretKeyReference {
    fn default() -> Self {
        Self {
            name: String::new(),
            key: default_password_key(),
        }
    }
}

fn default_password_key() -> String {
    DEFAULT_PASSWORD_KEY.to_owned()
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub name: String,
    pub db: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MongoDbStatus {
    pub phase: String,
    pub mongo_uri: String,
    pub current_mongo_db_members: i32,
}

impl Status for MongoDbStatus {}

/// accessors on the live custom resource
pub trait MongoDbObj {
    /// replica set service, `<name>-svc` unless overridden
    fn service_name(&self) -> String;

    fn user(&self, name: &str) -> Option<&MongoDbUser>;

    /// reference making the resource the controller of an add-on object
    fn owner_reference(&self) -> OwnerReferences;
}

impl MongoDbObj for K8Obj<MongoDbSpec> {
    fn service_name(&self) -> String {
        match &self.spec.service_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}-svc", self.metadata.name),
        }
    }

    fn user(&self, name: &str) -> Option<&MongoDbUser> {
        self.spec.users.iter().find(|user| user.name == name)
    }

    fn owner_reference(&self) -> OwnerReferences {
        self.metadata.make_owner_reference::<MongoDbSpec>()
    }
}
