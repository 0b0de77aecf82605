use axum::http::StatusCode;
use ccloud_sdk::cluster::{Cluster, ClusterCreateConfig};
use ccloud_sdk::kafka::acl::{AclBinding, AclBindingFilter, AclEntry, AclPattern};
use ccloud_sdk::kafka::Client as KafkaClient;
use ccloud_sdk::{Client, Error as SdkError};
use ccloud_simulator::server::state::DEFAULT_ENVIRONMENT_ID;
use ccloud_simulator::testing::{with_server, with_session};

async fn create_cluster(client: &Client) -> Cluster {
    let config = ClusterCreateConfig::new("orders", DEFAULT_ENVIRONMENT_ID, "us-west-2", "aws");
    client.clusters().create(config).await.unwrap()
}

fn binding(topic: &str, operation: &str) -> AclBinding {
    AclBinding {
        pattern: AclPattern {
            resource_type: "TOPIC".to_string(),
            name: topic.to_string(),
            pattern_type: "LITERAL".to_string(),
        },
        entry: AclEntry {
            principal: "User:42".to_string(),
            operation: operation.to_string(),
            host: "*".to_string(),
            permission_type: "ALLOW".to_string(),
        },
    }
}

#[tokio::test]
async fn test_access_token_requires_session() {
    with_server(|client| async move {
        let res = client.kafka_cluster_access_token().await;
        assert!(matches!(res, Err(SdkError::Api { status: StatusCode::UNAUTHORIZED, .. })));

        client.login().await.unwrap();
        let token = client.kafka_cluster_access_token().await.unwrap();
        assert!(!token.is_empty());
        assert_ne!(Some(token), client.session_token().await);
    })
    .await;
}

#[tokio::test]
async fn test_acls() {
    with_session(|client| async move {
        let cluster = create_cluster(&client).await;
        let endpoint = cluster.kafka_api_endpoint().unwrap();
        let kafka = client.kafka_cluster(&endpoint, &cluster.id).await.unwrap();
        assert_eq!(kafka.cluster_id(), cluster.id);

        let bindings = vec![binding("orders", "READ"), binding("orders", "WRITE")];
        let created = kafka.create_acls(&bindings).await.unwrap();
        assert_eq!(created, bindings);

        // Remove the READ binding only.
        let mut filter = AclBindingFilter::default();
        filter.pattern_filter.name = "orders".to_string();
        filter.entry_filter.operation = "READ".to_string();
        let deleted = kafka.delete_acls(&[filter.clone()]).await.unwrap();
        assert_eq!(deleted, vec![filter.clone()]);

        // Nothing left to match.
        let deleted = kafka.delete_acls(&[filter]).await.unwrap();
        assert!(deleted.is_empty());

        // The convenience methods perform their own token exchange.
        let deleted = client
            .delete_acls(&endpoint, &cluster.id, &[AclBindingFilter::default()])
            .await
            .unwrap();
        assert_eq!(deleted.len(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_invalid_acl() {
    with_session(|client| async move {
        let cluster = create_cluster(&client).await;
        let endpoint = cluster.kafka_api_endpoint().unwrap();

        let mut invalid = binding("orders", "READ");
        invalid.pattern.pattern_type = "MATCH".to_string();
        let res = client.create_acls(&endpoint, &cluster.id, &[invalid]).await;
        match res {
            Err(SdkError::Http { operation, status, body }) => {
                assert_eq!(operation, "create_acls");
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(body.contains("patternType"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let res = client
            .create_acls(&endpoint, "lkc-missing", &[binding("orders", "READ")])
            .await;
        assert!(matches!(res, Err(SdkError::Http { status: StatusCode::NOT_FOUND, .. })));
    })
    .await;
}

#[tokio::test]
async fn test_session_token_is_not_a_cluster_token() {
    with_session(|client| async move {
        let cluster = create_cluster(&client).await;
        let endpoint = cluster.kafka_api_endpoint().unwrap();
        let session = client.session_token().await.unwrap();

        let kafka = KafkaClient::new(&client, &endpoint, &cluster.id, session).unwrap();
        let res = kafka.create_acls(&[binding("orders", "READ")]).await;
        assert!(matches!(res, Err(SdkError::Http { status: StatusCode::UNAUTHORIZED, .. })));
    })
    .await;
}
