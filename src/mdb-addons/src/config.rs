//!
//! # Add-on configuration
//!
//! Images, storage location and monitoring settings shared by every add-on object.
//! Loaded once by the operator, either from a yaml file or from the environment.
//!
use std::fs::File;
use std::io::Error as IoError;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;
use tracing::debug;

pub const BACKUP_IMAGE_ENV: &str = "MONGODB_BACKUP_IMAGE";
pub const BACKUP_PULL_SECRETS_ENV: &str = "MONGODB_BACKUP_IMAGE_PULL_SECRETS";
pub const BACKUP_ROOT_ENV: &str = "MONGODB_BACKUP_ROOT";
pub const EXPORTER_IMAGE_ENV: &str = "MONGODB_EXPORTER_IMAGE";
pub const EXPORTER_PULL_SECRETS_ENV: &str = "MONGODB_EXPORTER_IMAGE_PULL_SECRETS";

const DEFAULT_BACKUP_CREDENTIALS_SECRET: &str = "data-backuper-credentials";
const DEFAULT_BACKUP_CREDENTIALS_KEY: &str = "GOOGLE_SERVICE_ACCOUNT_JSON_KEY";
const DEFAULT_EXPORTER_IMAGE: &str = "percona/mongodb_exporter:0.40";
const DEFAULT_PROMETHEUS_NAMESPACE: &str = "monitoring";
const DEFAULT_PROMETHEUS_NAME: &str = "app-prometheus";
const DEFAULT_CLUSTER_DOMAIN: &str = "cluster.local";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("Yaml error: {0}")]
    SerdeError(#[from] SerdeYamlError),
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddonConfig {
    /// image with mongodump and gsutil
    pub backup_image: String,
    pub backup_pull_secrets: Vec<String>,
    /// bucket prefix, ex: `gs://backups/`
    pub backup_root: String,
    /// secret holding the storage service account key
    pub backup_credentials_secret: String,
    pub backup_credentials_key: String,
    pub exporter_image: String,
    pub exporter_pull_secrets: Vec<String>,
    /// namespace where prometheus looks for service monitors
    pub prometheus_namespace: String,
    /// value of the `prometheus` label selecting service monitors
    pub prometheus_name: String,
    pub cluster_domain: String,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            backup_image: String::new(),
            backup_pull_secrets: vec![],
            backup_root: String::new(),
            backup_credentials_secret: DEFAULT_BACKUP_CREDENTIALS_SECRET.to_owned(),
            backup_credentials_key: DEFAULT_BACKUP_CREDENTIALS_KEY.to_owned(),
            exporter_image: DEFAULT_EXPORTER_IMAGE.to_owned(),
            exporter_pull_secrets: vec![],
            prometheus_namespace: DEFAULT_PROMETHEUS_NAMESPACE.to_owned(),
            prometheus_name: DEFAULT_PROMETHEUS_NAME.to_owned(),
            cluster_domain: DEFAULT_CLUSTER_DOMAIN.to_owned(),
        }
    }
}

impl AddonConfig {
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn to_file<T: AsRef<Path>>(&self, path: T) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        Ok(serde_yaml::to_writer(file, self)?)
    }

    /// load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// load from key value pairs.
    /// backup image and root are required, everything else falls back to defaults
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        let mut backup_image = None;
        let mut backup_root = None;

        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                BACKUP_IMAGE_ENV => backup_image = Some(value),
                BACKUP_ROOT_ENV => backup_root = Some(value),
                BACKUP_PULL_SECRETS_ENV => config.backup_pull_secrets = split_list(&value),
                EXPORTER_IMAGE_ENV => config.exporter_image = value,
                EXPORTER_PULL_SECRETS_ENV => config.exporter_pull_secrets = split_list(&value),
                _ => {}
            }
        }

        config.backup_image = backup_image.ok_or(ConfigError::MissingEnv(BACKUP_IMAGE_ENV))?;
        config.backup_root = backup_root.ok_or(ConfigError::MissingEnv(BACKUP_ROOT_ENV))?;
        debug!("add-on config from environment: {:#?}", config);
        Ok(config)
    }

    /// backup root with exactly one trailing slash
    pub fn backup_prefix(&self) -> String {
        if self.backup_root.is_empty() || self.backup_root.ends_with('/') {
            self.backup_root.clone()
        } else {
            format!("{}/", self.backup_root)
        }
    }
}

/// comma separated list, blanks dropped
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod test {

    use super::AddonConfig;
    use super::ConfigError;

    #[test]
    fn test_config_file() {
        let config = AddonConfig::from_file("data/addon-config.yaml").expect("read");
        assert_eq!(config.backup_image, "registry.local/mongodb-backup:1.4");
        assert_eq!(config.backup_root, "gs://db-backups/");
        assert_eq!(config.backup_pull_secrets, vec!["registry-creds".to_owned()]);
        assert_eq!(config.prometheus_name, "cluster-prometheus");
        // not in file
        assert_eq!(config.prometheus_namespace, "monitoring");
        assert_eq!(config.cluster_domain, "cluster.local");
        assert_eq!(config.backup_credentials_key, "GOOGLE_SERVICE_ACCOUNT_JSON_KEY");
    }

    #[test]
    fn test_config_from_vars() {
        let config = AddonConfig::from_vars(vec![
            ("MONGODB_BACKUP_IMAGE", "backup:1"),
            ("MONGODB_BACKUP_ROOT", "gs://bucket"),
            ("MONGODB_BACKUP_IMAGE_PULL_SECRETS", "one, two,,"),
            ("MONGODB_EXPORTER_IMAGE", "exporter:2"),
            ("HOME", "/root"),
        ])
        .expect("config");

        assert_eq!(config.backup_image, "backup:1");
        assert_eq!(config.backup_pull_secrets, vec!["one".to_owned(), "two".to_owned()]);
        assert_eq!(config.exporter_image, "exporter:2");
        assert!(config.exporter_pull_secrets.is_empty());
        assert_eq!(config.backup_prefix(), "gs://bucket/");
    }

    #[test]
    fn test_config_missing_image() {
        let err = AddonConfig::from_vars(vec![("MONGODB_BACKUP_ROOT", "gs://bucket/")])
            .expect_err("missing image");
        assert!(matches!(err, ConfigError::MissingEnv("MONGODB_BACKUP_IMAGE")));
    }
}
