use axum::http::StatusCode;
use ccloud_sdk::api_key::{ApiKeyCreateRequest, LogicalCluster};
use ccloud_sdk::cluster::{Cluster, ClusterCreateConfig};
use ccloud_sdk::connector::ConnectorConfig;
use ccloud_sdk::schema_registry::ACCOUNT_REGISTRY_NAME;
use ccloud_sdk::{Client, Error as SdkError};
use ccloud_simulator::server::state::DEFAULT_ENVIRONMENT_ID;
use ccloud_simulator::testing::with_session;

async fn create_cluster(client: &Client, name: &str) -> Cluster {
    let config = ClusterCreateConfig::new(name, DEFAULT_ENVIRONMENT_ID, "us-west-2", "aws");
    client.clusters().create(config).await.unwrap()
}

fn connector_config(class: &str, tasks: &str) -> ConnectorConfig {
    let mut config = ConnectorConfig::new();
    config.insert("connector.class".to_string(), class.to_string());
    config.insert("tasks.max".to_string(), tasks.to_string());
    config
}

#[tokio::test]
async fn test_api_keys() {
    with_session(|client| async move {
        let cluster = create_cluster(&client, "orders").await;
        let api_keys = client.api_keys();

        let key = api_keys
            .create(ApiKeyCreateRequest {
                account_id: DEFAULT_ENVIRONMENT_ID.to_string(),
                user_id: None,
                description: "ci".to_string(),
                logical_clusters: vec![LogicalCluster::kafka(&cluster.id)],
            })
            .await
            .unwrap();
        assert!(!key.key.is_empty());
        assert!(!key.secret.is_empty());
        assert!(!key.service_account);

        // The secret is only returned on creation.
        let listed = api_keys.list(&cluster.id, DEFAULT_ENVIRONMENT_ID).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, key.key);
        assert!(listed[0].secret.is_empty());

        api_keys
            .delete(key.id, DEFAULT_ENVIRONMENT_ID, key.logical_clusters.clone())
            .await
            .unwrap();
        assert!(api_keys.list(&cluster.id, DEFAULT_ENVIRONMENT_ID).await.unwrap().is_empty());

        let res = api_keys
            .delete(key.id, DEFAULT_ENVIRONMENT_ID, key.logical_clusters)
            .await;
        assert!(matches!(res, Err(SdkError::Api { status: StatusCode::NOT_FOUND, .. })));
    })
    .await;
}

#[tokio::test]
async fn test_service_accounts() {
    with_session(|client| async move {
        let cluster = create_cluster(&client, "orders").await;
        let accounts = client.service_accounts();

        // Concurrent creation through clones of the same session.
        let created = futures::future::join_all((0..4).map(|i| {
            let accounts = client.clone().service_accounts();
            async move { accounts.create(&format!("svc-{i}"), "worker").await }
        }))
        .await;
        let created: Vec<_> = created.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            accounts.list(&cluster.id, DEFAULT_ENVIRONMENT_ID).await.unwrap().len(),
            4
        );

        let res = accounts.create("svc-0", "again").await;
        assert!(matches!(res, Err(SdkError::Api { status: StatusCode::CONFLICT, .. })));

        // Keys can be issued for a service account.
        let key = client
            .api_keys()
            .create(ApiKeyCreateRequest {
                account_id: DEFAULT_ENVIRONMENT_ID.to_string(),
                user_id: Some(created[0].id),
                description: String::new(),
                logical_clusters: vec![LogicalCluster::kafka(&cluster.id)],
            })
            .await
            .unwrap();
        assert!(key.service_account);
        assert_eq!(key.user_id, created[0].id);

        accounts.delete(created[0].id).await.unwrap();
        let remaining = accounts.list(&cluster.id, DEFAULT_ENVIRONMENT_ID).await.unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|a| a.id != created[0].id));
    })
    .await;
}

#[tokio::test]
async fn test_connectors() {
    with_session(|client| async move {
        let cluster = create_cluster(&client, "orders").await;
        let connectors = client.connectors();
        assert!(connectors
            .list(DEFAULT_ENVIRONMENT_ID, &cluster.id)
            .await
            .unwrap()
            .is_empty());

        let sink = connectors
            .create(
                DEFAULT_ENVIRONMENT_ID,
                &cluster.id,
                "warehouse",
                connector_config("S3_SINK", "2"),
            )
            .await
            .unwrap();
        assert_eq!(sink.connector_type, "sink");
        assert_eq!(sink.tasks.len(), 2);
        connectors
            .create(
                DEFAULT_ENVIRONMENT_ID,
                &cluster.id,
                "audit",
                connector_config("PostgresCdcSource", "1"),
            )
            .await
            .unwrap();

        // Listed by name.
        let listed = connectors.list(DEFAULT_ENVIRONMENT_ID, &cluster.id).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["audit", "warehouse"]);
        assert!(listed.iter().all(|c| c.id.id.starts_with("lcc-")));

        let updated = connectors
            .update_config(
                DEFAULT_ENVIRONMENT_ID,
                &cluster.id,
                "warehouse",
                connector_config("S3_SINK", "4"),
            )
            .await
            .unwrap();
        assert_eq!(updated.tasks.len(), 4);

        let res = connectors
            .create(
                DEFAULT_ENVIRONMENT_ID,
                &cluster.id,
                "audit",
                connector_config("PostgresCdcSource", "1"),
            )
            .await;
        assert!(matches!(res, Err(SdkError::Api { status: StatusCode::CONFLICT, .. })));

        connectors
            .delete(DEFAULT_ENVIRONMENT_ID, &cluster.id, "audit")
            .await
            .unwrap();
        let res = connectors
            .delete(DEFAULT_ENVIRONMENT_ID, &cluster.id, "audit")
            .await;
        assert!(matches!(res, Err(SdkError::Api { status: StatusCode::NOT_FOUND, .. })));
        assert_eq!(
            connectors.list(DEFAULT_ENVIRONMENT_ID, &cluster.id).await.unwrap().len(),
            1
        );
    })
    .await;
}

#[tokio::test]
async fn test_schema_registry() {
    with_session(|client| async move {
        let registries = client.schema_registries();
        assert!(registries.get(DEFAULT_ENVIRONMENT_ID).await.unwrap().is_none());

        // A registry needs a cluster in the environment.
        let res = registries.create(DEFAULT_ENVIRONMENT_ID, "us", "aws").await;
        assert!(matches!(res, Err(SdkError::NoKafkaCluster(ref id)) if id == DEFAULT_ENVIRONMENT_ID));

        create_cluster(&client, "orders").await;
        let registry = registries
            .create(DEFAULT_ENVIRONMENT_ID, "us", "aws")
            .await
            .unwrap();
        assert!(registry.id.starts_with("lsrc-"));
        assert_eq!(registry.name, ACCOUNT_REGISTRY_NAME);
        assert_eq!(registry.account_id, DEFAULT_ENVIRONMENT_ID);

        // Enabling twice returns the existing registry.
        let again = registries
            .create(DEFAULT_ENVIRONMENT_ID, "us", "aws")
            .await
            .unwrap();
        assert_eq!(again.id, registry.id);
        assert_eq!(
            registries.get(DEFAULT_ENVIRONMENT_ID).await.unwrap().map(|r| r.id),
            Some(registry.id)
        );
    })
    .await;
}
