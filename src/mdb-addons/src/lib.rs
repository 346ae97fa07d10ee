mod error;

pub mod backup;
pub mod builder;
pub mod config;
pub mod credentials;
pub mod exporter;
pub mod resource;
pub mod schedule;

pub use error::AddonError;
pub use error::BuildError;

pub use backup::{build_backup_cron_job, build_backup_uri_secret, ensure_backup, remove_backup};
pub use config::{AddonConfig, ConfigError};
pub use credentials::{connection_string, read_user_password};
pub use exporter::{
    build_exporter_deployment, build_exporter_service, build_exporter_service_account,
    build_exporter_service_monitor, build_exporter_uri_secret, ensure_exporter,
};
pub use resource::{MongoDbObj, MongoDbSpec, MongoDbUser};
pub use schedule::backup_schedule;
