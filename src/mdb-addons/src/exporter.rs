//!
//! # Metrics exporter add-on
//!
//! Runs a prometheus exporter next to the replica set, exposes it through a headless
//! service and registers a service monitor with the cluster prometheus.
//!
use std::collections::HashMap;

use tracing::debug;
use tracing::info;

use k8_apply::{create_or_update, ensure_exists, GetCreator, GetUpdateCreator, ItemClient};
use k8_types::app::deployment::DeploymentSpec;
use k8_types::core::pod::{ContainerPortSpec, ContainerSpec, HttpGetAction, Probe};
use k8_types::core::secret::SecretSpec;
use k8_types::core::service::ServiceSpec;
use k8_types::core::service_account::ServiceAccountSpec;
use k8_types::monitoring::service_monitor::ServiceMonitorSpec;
use k8_types::{Env, InputK8Obj, K8Obj};

use crate::builder::{
    app_label, DeploymentBuilder, MetaBuilder, PodTemplate, SecretBuilder, ServiceAccountBuilder,
    ServiceBuilder, ServiceMonitorBuilder,
};
use crate::config::AddonConfig;
use crate::credentials::{user_connection_string, URI_KEY};
use crate::resource::{MongoDbObj, MongoDbSpec};
use crate::{AddonError, BuildError};

pub const METRICS_USERNAME: &str = "metrics";
pub const EXPORTER_PORT: u16 = 9216;
pub const METRICS_PORT_NAME: &str = "metrics";
pub const METRICS_PATH: &str = "/metrics";

const EXPORTER_CONTAINER: &str = "mongodb-exporter";

/// client able to reconcile every object of the exporter add-on
pub trait ExporterClient:
    GetCreator<ServiceAccountSpec>
    + GetCreator<SecretSpec>
    + GetUpdateCreator<DeploymentSpec>
    + GetUpdateCreator<ServiceSpec>
    + GetCreator<ServiceMonitorSpec>
{
}

impl<C> ExporterClient for C where
    C: GetCreator<ServiceAccountSpec>
        + GetCreator<SecretSpec>
        + GetUpdateCreator<DeploymentSpec>
        + GetUpdateCreator<ServiceSpec>
        + GetCreator<ServiceMonitorSpec>
{
}

/// name of service account, deployment and service monitor
pub fn exporter_name(mdb: &K8Obj<MongoDbSpec>) -> String {
    format!("{}-exporter", mdb.metadata.name)
}

pub fn exporter_uri_secret_name(mdb: &K8Obj<MongoDbSpec>) -> String {
    format!("{}-exporter-uri", mdb.metadata.name)
}

pub fn exporter_service_name(mdb: &K8Obj<MongoDbSpec>) -> String {
    format!("{}-exporter-svc", mdb.metadata.name)
}

pub fn build_exporter_service_account(
    mdb: &K8Obj<MongoDbSpec>,
) -> Result<InputK8Obj<ServiceAccountSpec>, BuildError> {
    ServiceAccountBuilder::new(exporter_name(mdb), mdb.metadata.namespace.clone())
        .set_labels(app_label(exporter_name(mdb)))
        .set_owner(mdb.owner_reference())
        .build()
}

pub fn build_exporter_uri_secret(
    mdb: &K8Obj<MongoDbSpec>,
    uri: &str,
) -> Result<InputK8Obj<SecretSpec>, BuildError> {
    SecretBuilder::new(exporter_uri_secret_name(mdb), mdb.metadata.namespace.clone())
        .set_labels(app_label(exporter_name(mdb)))
        .set_owner(mdb.owner_reference())
        .set_field(URI_KEY, uri)
        .build()
}

fn http_probe() -> Probe {
    Probe {
        http_get: Some(HttpGetAction {
            path: "/".to_owned(),
            port: EXPORTER_PORT,
            scheme: None,
        }),
        ..Default::default()
    }
}

pub fn build_exporter_deployment(
    mdb: &K8Obj<MongoDbSpec>,
    config: &AddonConfig,
) -> Result<InputK8Obj<DeploymentSpec>, BuildError> {
    let labels = app_label(exporter_name(mdb));

    let container = ContainerSpec {
        name: EXPORTER_CONTAINER.to_owned(),
        image: Some(config.exporter_image.clone()),
        args: vec![
            format!("--web.listen-address=:{}", EXPORTER_PORT),
            format!("--web.telemetry-path={}", METRICS_PATH),
            "--collect-all".to_owned(),
        ],
        ports: vec![ContainerPortSpec::new(EXPORTER_PORT, METRICS_PORT_NAME)],
        env: vec![Env::key_secret_ref(
            "MONGODB_URI".to_owned(),
            exporter_uri_secret_name(mdb),
            URI_KEY.to_owned(),
        )],
        liveness_probe: Some(http_probe()),
        readiness_probe: Some(http_probe()),
        ..Default::default()
    };

    let template = PodTemplate::default()
        .set_labels(labels.clone())
        .add_container(container)
        .set_service_account(exporter_name(mdb))
        .set_image_pull_secrets(config.exporter_pull_secrets.clone());

    DeploymentBuilder::new(exporter_name(mdb), mdb.metadata.namespace.clone())
        .set_labels(labels.clone())
        .set_owner(mdb.owner_reference())
        .set_selector(labels)
        .set_replicas(1)
        .set_pod_template(template)
        .build()
}

pub fn build_exporter_service(
    mdb: &K8Obj<MongoDbSpec>,
) -> Result<InputK8Obj<ServiceSpec>, BuildError> {
    let labels = app_label(exporter_name(mdb));
    ServiceBuilder::new(exporter_service_name(mdb), mdb.metadata.namespace.clone())
        .set_labels(labels.clone())
        .set_owner(mdb.owner_reference())
        .set_selector(labels)
        .set_cluster_ip("None")
        .set_port(EXPORTER_PORT)
        .set_port_name(METRICS_PORT_NAME)
        .set_publish_not_ready_addresses(true)
        .build()
}

/// lives in the prometheus namespace, so it can't be owned by the resource
pub fn build_exporter_service_monitor(
    mdb: &K8Obj<MongoDbSpec>,
    config: &AddonConfig,
) -> Result<InputK8Obj<ServiceMonitorSpec>, BuildError> {
    let mut labels = HashMap::new();
    labels.insert("prometheus".to_owned(), config.prometheus_name.clone());

    ServiceMonitorBuilder::new(exporter_name(mdb), config.prometheus_namespace.clone())
        .set_labels(labels)
        .set_port(METRICS_PORT_NAME)
        .add_namespace(mdb.metadata.namespace.clone())
        .set_match_labels(app_label(exporter_name(mdb)))
        .build()
}

/// reconcile exporter objects in order, stops at the first failure.
/// service account, secret and service monitor are only created,
/// deployment and service are updated when their owned fields drift
pub async fn ensure_exporter<C>(
    client: &C,
    mdb: &K8Obj<MongoDbSpec>,
    config: &AddonConfig,
) -> Result<(), AddonError<<C as ItemClient>::Error>>
where
    C: ExporterClient,
{
    let name = &mdb.metadata.name;

    let service_account = build_exporter_service_account(mdb)?;
    ensure_exists(client, service_account).await?;
    debug!("exporter service account ready for '{}'", name);

    let uri = user_connection_string(client, mdb, METRICS_USERNAME, config).await?;
    let secret = build_exporter_uri_secret(mdb, &uri)?;
    ensure_exists(client, secret).await?;
    debug!("exporter uri secret ready for '{}'", name);

    let deployment = build_exporter_deployment(mdb, config)?;
    let result = create_or_update(client, deployment).await?;
    if !result.is_none() {
        info!("exporter deployment for '{}' applied", name);
    }

    let service = build_exporter_service(mdb)?;
    create_or_update(client, service).await?;
    debug!("exporter service ready for '{}'", name);

    let monitor = build_exporter_service_monitor(mdb, config)?;
    if ensure_exists(client, monitor).await?.is_created() {
        info!(
            "registered '{}' with prometheus '{}'",
            name, config.prometheus_name
        );
    }

    Ok(())
}
