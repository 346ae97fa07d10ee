//!
//! # Backup add-on
//!
//! A cron job dumping the replica set and copying the dump to a bucket, twice a day.
//! The job reads its connection string from a dedicated secret built from the
//! `backup` user's password.
//!
use tracing::info;

use k8_apply::{
    create_or_update, ensure_absent, ensure_exists, GetCreator, GetUpdateCreator, ItemClient,
    ItemDeleter,
};
use k8_types::batch::cron_job::CronJobSpec;
use k8_types::core::pod::{
    ContainerSpec, KeyToPath, PodRestartPolicy, SecretVolumeSpec, VolumeMount, VolumeSpec,
};
use k8_types::core::secret::SecretSpec;
use k8_types::{Env, InputK8Obj, ItemMeta, K8Obj};

use crate::builder::{app_label, CronJobBuilder, MetaBuilder, PodTemplate, SecretBuilder};
use crate::config::AddonConfig;
use crate::credentials::{user_connection_string, URI_KEY};
use crate::resource::{MongoDbObj, MongoDbSpec};
use crate::{AddonError, BuildError};

pub const BACKUP_USERNAME: &str = "backup";

const BACKUP_CONTAINER: &str = "mongodb-backup";
const CREDENTIALS_VOLUME: &str = "creds-json";
const CREDENTIALS_MOUNT_PATH: &str = "/etc/gcp";
const CREDENTIALS_FILE: &str = "creds.json";

/// client able to reconcile every object of the backup add-on
pub trait BackupClient: GetCreator<SecretSpec> + GetUpdateCreator<CronJobSpec> {}

impl<C> BackupClient for C where C: GetCreator<SecretSpec> + GetUpdateCreator<CronJobSpec> {}

pub fn backup_name(mdb: &K8Obj<MongoDbSpec>) -> String {
    format!("{}-backup", mdb.metadata.name)
}

pub fn backup_uri_secret_name(mdb: &K8Obj<MongoDbSpec>) -> String {
    format!("{}-backup-uri", mdb.metadata.name)
}

/// shell script run by the backup container
pub fn backup_command(mdb: &K8Obj<MongoDbSpec>, config: &AddonConfig) -> String {
    let name = &mdb.metadata.name;
    format!(
        "mkdir bkps;/usr/bin/mongodump $MONGODB_URI -o bkps/; \
         gcloud auth activate-service-account --key-file=$GOOGLE_APPLICATION_CREDENTIALS; \
         gsutil -m cp -r bkps/* {}{}/{}/{}-$(date +%Y%m%d-%H%M%S)/",
        config.backup_prefix(),
        mdb.metadata.namespace,
        name,
        name
    )
}

pub fn build_backup_cron_job(
    mdb: &K8Obj<MongoDbSpec>,
    config: &AddonConfig,
) -> Result<InputK8Obj<CronJobSpec>, BuildError> {
    let container = ContainerSpec {
        name: BACKUP_CONTAINER.to_owned(),
        image: Some(config.backup_image.clone()),
        args: vec![
            "/bin/sh".to_owned(),
            "-c".to_owned(),
            backup_command(mdb, config),
        ],
        env: vec![
            Env::key_secret_ref(
                "MONGODB_URI".to_owned(),
                backup_uri_secret_name(mdb),
                URI_KEY.to_owned(),
            ),
            Env::key_value(
                "GOOGLE_APPLICATION_CREDENTIALS".to_owned(),
                format!("{}/{}", CREDENTIALS_MOUNT_PATH, CREDENTIALS_FILE),
            ),
        ],
        volume_mounts: vec![VolumeMount {
            name: CREDENTIALS_VOLUME.to_owned(),
            mount_path: CREDENTIALS_MOUNT_PATH.to_owned(),
            read_only: Some(true),
            ..Default::default()
        }],
        ..Default::default()
    };

    let credentials = VolumeSpec {
        name: CREDENTIALS_VOLUME.to_owned(),
        secret: Some(SecretVolumeSpec {
            secret_name: config.backup_credentials_secret.clone(),
            items: Some(vec![KeyToPath {
                key: config.backup_credentials_key.clone(),
                path: CREDENTIALS_FILE.to_owned(),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };

    let template = PodTemplate::default()
        .add_container(container)
        .add_volume(credentials)
        .set_restart_policy(PodRestartPolicy::OnFailure)
        .set_image_pull_secrets(config.backup_pull_secrets.clone());

    CronJobBuilder::new(backup_name(mdb), mdb.metadata.namespace.clone())
        .set_labels(app_label(mdb.service_name()))
        .set_owner(mdb.owner_reference())
        .set_pod_template(template)
        .build()
}

pub fn build_backup_uri_secret(
    mdb: &K8Obj<MongoDbSpec>,
    uri: &str,
) -> Result<InputK8Obj<SecretSpec>, BuildError> {
    SecretBuilder::new(backup_uri_secret_name(mdb), mdb.metadata.namespace.clone())
        .set_labels(app_label(mdb.service_name()))
        .set_owner(mdb.owner_reference())
        .set_field(URI_KEY, uri)
        .build()
}

/// make sure uri secret and cron job exist.
/// secret is never rewritten, cron job is brought back to the desired schedule and template
pub async fn ensure_backup<C>(
    client: &C,
    mdb: &K8Obj<MongoDbSpec>,
    config: &AddonConfig,
) -> Result<(), AddonError<<C as ItemClient>::Error>>
where
    C: BackupClient,
{
    let uri = user_connection_string(client, mdb, BACKUP_USERNAME, config).await?;

    let secret = build_backup_uri_secret(mdb, &uri)?;
    if ensure_exists(client, secret).await?.is_created() {
        info!("created backup uri secret for '{}'", mdb.metadata.name);
    }

    let cron_job = build_backup_cron_job(mdb, config)?;
    let result = create_or_update(client, cron_job).await?;
    if result.is_created() {
        info!("created backup cron job for '{}'", mdb.metadata.name);
    } else if result.is_updated() {
        info!("updated backup cron job for '{}'", mdb.metadata.name);
    }

    Ok(())
}

/// delete cron job and uri secret, missing objects are fine
pub async fn remove_backup<C>(
    client: &C,
    mdb: &K8Obj<MongoDbSpec>,
) -> Result<(), AddonError<<C as ItemClient>::Error>>
where
    C: ItemDeleter<CronJobSpec> + ItemDeleter<SecretSpec>,
{
    let namespace = mdb.metadata.namespace.clone();
    ensure_absent::<_, CronJobSpec>(client, &ItemMeta::new(backup_name(mdb), namespace.clone()))
        .await?;
    ensure_absent::<_, SecretSpec>(client, &ItemMeta::new(backup_uri_secret_name(mdb), namespace))
        .await?;
    info!("removed backup of '{}'", mdb.metadata.name);
    Ok(())
}

#[cfg(test)]
mod test {

    use k8_types::{K8Obj, ObjectMeta};

    use crate::config::AddonConfig;
    use crate::resource::MongoDbSpec;

    use super::{backup_command, build_backup_cron_job, build_backup_uri_secret};

    fn mdb() -> K8Obj<MongoDbSpec> {
        let mut mdb = K8Obj {
            metadata: ObjectMeta::new("rs0", "ns1"),
            spec: MongoDbSpec::default(),
            ..Default::default()
        };
        mdb.metadata.uid = "uid-rs0".to_owned();
        mdb
    }

    fn config() -> AddonConfig {
        AddonConfig {
            backup_image: "backup:1".to_owned(),
            backup_root: "gs://bucket/".to_owned(),
            backup_pull_secrets: vec!["registry".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn test_backup_command() {
        assert_eq!(
            backup_command(&mdb(), &config()),
            "mkdir bkps;/usr/bin/mongodump $MONGODB_URI -o bkps/; \
             gcloud auth activate-service-account --key-file=$GOOGLE_APPLICATION_CREDENTIALS; \
             gsutil -m cp -r bkps/* gs://bucket/ns1/rs0/rs0-$(date +%Y%m%d-%H%M%S)/"
        );
    }

    #[test]
    fn test_backup_cron_job() {
        let cron_job = build_backup_cron_job(&mdb(), &config()).expect("build");

        assert_eq!(cron_job.metadata.name, "rs0-backup");
        assert_eq!(cron_job.metadata.namespace, "ns1");
        assert_eq!(cron_job.metadata.labels.get("app").unwrap(), "rs0-svc");
        assert_eq!(cron_job.metadata.owner_references[0].uid, "uid-rs0");
        assert_eq!(cron_job.spec.schedule, "0 11,23 * * *");

        let pod = &cron_job.spec.job_template.spec.template.spec;
        assert_eq!(pod.image_pull_secrets[0].name, "registry");
        assert_eq!(pod.volumes[0].name, "creds-json");
        let volume = pod.volumes[0].secret.as_ref().expect("secret volume");
        assert_eq!(volume.secret_name, "data-backuper-credentials");
        let items = volume.items.as_ref().expect("items");
        assert_eq!(items[0].key, "GOOGLE_SERVICE_ACCOUNT_JSON_KEY");
        assert_eq!(items[0].path, "creds.json");

        let container = &pod.containers[0];
        assert_eq!(container.name, "mongodb-backup");
        assert_eq!(container.image.as_deref(), Some("backup:1"));
        assert_eq!(container.args[0..2], ["/bin/sh".to_owned(), "-c".to_owned()]);
        assert_eq!(container.volume_mounts[0].mount_path, "/etc/gcp");
        assert_eq!(container.volume_mounts[0].read_only, Some(true));

        let uri = container
            .env
            .iter()
            .find(|env| env.name == "MONGODB_URI")
            .expect("uri env");
        let secret_ref = uri
            .value_from
            .as_ref()
            .and_then(|source| source.secret_key_ref.as_ref())
            .expect("secret ref");
        assert_eq!(secret_ref.name, "rs0-backup-uri");
        assert_eq!(secret_ref.key, "mongodb-uri");
    }

    #[test]
    fn test_backup_uri_secret() {
        let secret = build_backup_uri_secret(&mdb(), "mongodb://x").expect("build");
        assert_eq!(secret.metadata.name, "rs0-backup-uri");
        assert_eq!(secret.header.data.get("mongodb-uri").unwrap(), "bW9uZ29kYjovL3g=");
    }
}
