use fluvio_future::test_async;

use k8_apply::{InMemoryClient, InMemoryError, ItemCreator, ItemGetter, ItemUpdater};
use k8_types::app::deployment::DeploymentSpec;
use k8_types::core::secret::SecretSpec;
use k8_types::core::service::{LoadBalancerType, ServiceSpec};
use k8_types::core::service_account::ServiceAccountSpec;
use k8_types::monitoring::service_monitor::ServiceMonitorSpec;
use k8_types::{ItemMeta, K8Obj, ObjectMeta};

use mdb_addons::builder::SecretBuilder;
use mdb_addons::resource::SecretKeyReference;
use mdb_addons::{
    build_exporter_service, ensure_exporter, AddonConfig, AddonError, MongoDbSpec, MongoDbUser,
};

const NS: &str = "ns1";

fn mongodb(with_metrics_user: bool) -> K8Obj<MongoDbSpec> {
    let mut users = vec![];
    if with_metrics_user {
        users.push(MongoDbUser {
            name: "metrics".to_owned(),
            db: "admin".to_owned(),
            password_secret_ref: SecretKeyReference {
                name: "rs0-metrics-user".to_owned(),
                key: "password".to_owned(),
            },
            ..Default::default()
        });
    }

    let mut metadata = ObjectMeta::new("rs0", NS);
    metadata.uid = "uid-rs0".to_owned();
    K8Obj {
        metadata,
        spec: MongoDbSpec {
            members: 3,
            users,
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn seeded_client() -> InMemoryClient {
    let client = InMemoryClient::new();
    let secret = SecretBuilder::new("rs0-metrics-user", NS)
        .set_field("password", "m3trics")
        .build()
        .expect("secret");
    client.create_item(secret).await.expect("seed password");
    client.reset_calls().expect("reset");
    client
}

#[test_async]
async fn test_exporter_first_pass() -> Result<(), AddonError<InMemoryError>> {
    let client = seeded_client().await;

    ensure_exporter(&client, &mongodb(true), &AddonConfig::default()).await?;

    assert_eq!(client.count::<ServiceAccountSpec>().expect("count"), 1);
    // password secret and exporter uri secret
    assert_eq!(client.count::<SecretSpec>().expect("count"), 2);
    assert_eq!(client.count::<DeploymentSpec>().expect("count"), 1);
    assert_eq!(client.count::<ServiceSpec>().expect("count"), 1);
    assert_eq!(client.count::<ServiceMonitorSpec>().expect("count"), 1);
    assert_eq!(client.calls().expect("calls").update, 0);

    let monitor: K8Obj<ServiceMonitorSpec> = client
        .retrieve_item(&ItemMeta::new("rs0-exporter", "monitoring"))
        .await
        .expect("service monitor");
    assert_eq!(monitor.spec.endpoints[0].port.as_deref(), Some("metrics"));

    client.reset_calls().expect("reset");
    ensure_exporter(&client, &mongodb(true), &AddonConfig::default()).await?;
    assert_eq!(client.calls().expect("calls").mutations(), 0);
    Ok(())
}

#[test_async]
async fn test_exporter_service_keeps_manual_annotation() -> Result<(), AddonError<InMemoryError>> {
    let client = seeded_client().await;
    let mdb = mongodb(true);

    let mut existing = build_exporter_service(&mdb).expect("service");
    existing
        .metadata
        .annotations
        .insert("owner".to_owned(), "manual".to_owned());
    client.create_item(existing).await.expect("seed service");

    ensure_exporter(&client, &mdb, &AddonConfig::default()).await?;

    let service: K8Obj<ServiceSpec> = client
        .retrieve_item(&ItemMeta::new("rs0-exporter-svc", NS))
        .await
        .expect("service");
    assert_eq!(service.metadata.annotations.get("owner").unwrap(), "manual");
    assert_eq!(service.spec.r#type, Some(LoadBalancerType::ClusterIP));
    assert_eq!(client.calls().expect("calls").update, 0);
    Ok(())
}

#[test_async]
async fn test_exporter_deployment_drift_is_repaired() -> Result<(), AddonError<InMemoryError>> {
    let client = seeded_client().await;
    let mdb = mongodb(true);
    ensure_exporter(&client, &mdb, &AddonConfig::default()).await?;

    let item = ItemMeta::new("rs0-exporter", NS);
    let live: K8Obj<DeploymentSpec> = client.retrieve_item(&item).await.expect("deployment");
    let mut drifted = live.as_update();
    drifted.spec.replicas = Some(3);
    drifted.spec.min_ready_seconds = Some(10);
    client.update_item(drifted).await.expect("drift");

    client.reset_calls().expect("reset");
    ensure_exporter(&client, &mdb, &AddonConfig::default()).await?;
    assert_eq!(client.calls().expect("calls").update, 1);

    let repaired: K8Obj<DeploymentSpec> = client.retrieve_item(&item).await.expect("deployment");
    assert_eq!(repaired.spec.replicas, Some(1));
    // not owned
    assert_eq!(repaired.spec.min_ready_seconds, Some(10));
    Ok(())
}

#[test_async]
async fn test_exporter_stops_at_first_failure() -> Result<(), InMemoryError> {
    let client = seeded_client().await;

    let err = ensure_exporter(&client, &mongodb(false), &AddonConfig::default())
        .await
        .expect_err("no metrics user");
    assert!(matches!(err, AddonError::UserNotDeclared { .. }));

    // service account comes first, nothing after the secret was attempted
    assert_eq!(client.count::<ServiceAccountSpec>()?, 1);
    assert_eq!(client.count::<DeploymentSpec>()?, 0);
    assert_eq!(client.count::<ServiceSpec>()?, 0);
    assert_eq!(client.count::<ServiceMonitorSpec>()?, 0);
    Ok(())
}
