//! Kafka cluster provisioning.

use crate::{request, Client as SdkClient, Error};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::debug;
use url::Url;

pub const PATH: &str = "clusters";

/// The network paths through which a cluster can be reached.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NetworkAccess {
    #[serde_as(as = "DefaultOnNull")]
    pub public_internet: Vec<serde_json::Value>,
    #[serde_as(as = "DefaultOnNull")]
    pub vpc_peering: Vec<serde_json::Value>,
    #[serde_as(as = "DefaultOnNull")]
    pub private_link: Vec<serde_json::Value>,
    #[serde_as(as = "DefaultOnNull")]
    pub transit_gateway: Vec<serde_json::Value>,
}

/// The deployment backing a cluster.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Deployment {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(alias = "deactiviated", skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<DateTime<Utc>>,
    #[serde_as(as = "DefaultOnNull")]
    pub account_id: String,
    pub network_access: NetworkAccess,
    #[serde_as(as = "DefaultOnNull")]
    pub sku: String,
}

/// A Kafka cluster.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Cluster {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub account_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub network_ingress: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub network_egress: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub storage: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub durability: String,
    #[serde_as(as = "DefaultOnNull")]
    pub status: String,
    #[serde_as(as = "DefaultOnNull")]
    pub endpoint: String,
    #[serde_as(as = "DefaultOnNull")]
    pub region: String,
    #[serde_as(as = "DefaultOnNull")]
    pub service_provider: String,
    #[serde_as(as = "DefaultOnNull")]
    pub organization_id: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub enterprise: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub k8s_cluster_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub physical_cluster_id: String,
    #[serde(alias = "prince_per_hour")]
    #[serde_as(as = "DefaultOnNull")]
    pub price_per_hour: String,
    #[serde_as(as = "DefaultOnNull")]
    pub accrued_this_cycle: String,
    #[serde(rename = "type")]
    #[serde_as(as = "DefaultOnNull")]
    pub cluster_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub api_endpoint: String,
    #[serde_as(as = "DefaultOnNull")]
    pub internal_proxy: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_sla_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_schedulable: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub dedicated: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub network_isolation_domain_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub max_network_ingress: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub max_network_egress: u64,
    pub deployment: Deployment,
    #[serde_as(as = "DefaultOnNull")]
    pub cku: u32,
}

impl Cluster {
    /// Parses the endpoint of the per-cluster Kafka API.
    ///
    /// Pass it together with the cluster id to [SdkClient::kafka_cluster].
    pub fn kafka_api_endpoint(&self) -> Result<Url, Error> {
        Ok(Url::parse(&self.api_endpoint)?)
    }
}

/// The deployment section of a [ClusterCreateConfig].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDeployment {
    pub sku: String,
    pub account_id: String,
}

/// The parameters of a new cluster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClusterCreateConfig {
    pub name: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub storage: u64,
    pub network_ingress: u64,
    pub network_egress: u64,
    pub region: String,
    #[serde(rename = "serviceProvider")]
    pub service_provider: String,
    pub durability: String,
    pub deployment: CreateDeployment,
    pub cku: u32,
}

/// Storage requested when none is specified, in GB.
pub const DEFAULT_STORAGE: u64 = 5000;

impl ClusterCreateConfig {
    /// Creates a config for a cluster in `account_id` hosted by `service_provider` in `region`.
    pub fn new(name: &str, account_id: &str, region: &str, service_provider: &str) -> Self {
        Self {
            name: name.to_string(),
            account_id: account_id.to_string(),
            storage: DEFAULT_STORAGE,
            network_ingress: 0,
            network_egress: 0,
            region: region.to_string(),
            service_provider: service_provider.to_string(),
            durability: String::new(),
            deployment: CreateDeployment {
                sku: String::new(),
                account_id: account_id.to_string(),
            },
            cku: 0,
        }
    }

    /// Sets the durability, e.g. `LOW` or `HIGH`.
    pub fn durability(mut self, durability: &str) -> Self {
        self.durability = durability.to_string();
        self
    }

    /// Sets the deployment sku, e.g. `BASIC`, `STANDARD` or `DEDICATED`.
    pub fn sku(mut self, sku: &str) -> Self {
        self.deployment.sku = sku.to_string();
        self
    }

    /// Sets the number of Confluent units for dedicated clusters.
    pub fn cku(mut self, cku: u32) -> Self {
        self.cku = cku;
        self
    }

    /// Sets the network ingress and egress limits in MB/s.
    pub fn network(mut self, ingress: u64, egress: u64) -> Self {
        self.network_ingress = ingress;
        self.network_egress = egress;
        self
    }
}

/// The JSON payload for a create request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ClusterCreatePayload {
    pub config: ClusterCreateConfig,
}

/// The JSON payload wrapping a single cluster.
#[derive(Serialize, Deserialize, Debug)]
pub struct ClusterPayload {
    pub cluster: Cluster,
}

/// The JSON payload wrapping a list of clusters.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct ClustersPayload {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

/// The identity of a cluster to delete.
#[derive(Serialize, Deserialize, Debug)]
pub struct ClusterRef {
    pub id: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
}

/// The JSON payload for a delete request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ClusterDeletePayload {
    pub cluster: ClusterRef,
}

/// A client for managing Kafka clusters.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Lists the clusters of an environment.
    pub async fn list(&self, account_id: &str) -> Result<Vec<Cluster>, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("account_id", account_id)]);
        let payload: ClustersPayload = request::send_json("clusters", req).await?;
        Ok(payload.clusters)
    }

    /// Provisions a new cluster.
    pub async fn create(&self, config: ClusterCreateConfig) -> Result<Cluster, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let body = ClusterCreatePayload { config };
        let req = self.client.request(Method::POST, url).await.json(&body);
        let payload: ClusterPayload = request::send_json("create cluster", req).await?;
        Ok(payload.cluster)
    }

    /// Retrieves a cluster of an environment.
    pub async fn get(&self, id: &str, account_id: &str) -> Result<Cluster, Error> {
        let url = self.client.endpoint(&[PATH, id])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("account_id", account_id)]);
        let payload: ClusterPayload = request::send_json("get cluster", req).await?;
        Ok(payload.cluster)
    }

    /// Renames a cluster.
    ///
    /// The API replaces the whole resource, so the current cluster is fetched
    /// first and sent back with the new name. Fields the provider spells
    /// `prince_per_hour` and `deployment.deactiviated` are read under either
    /// spelling but sent back as `price_per_hour` and `deployment.deactivated`.
    pub async fn update(&self, id: &str, account_id: &str, name: &str) -> Result<(), Error> {
        let mut cluster = self.get(id, account_id).await?;
        cluster.name = name.to_string();

        let url = self.client.endpoint(&[PATH, id])?;
        let body = ClusterPayload { cluster };
        let req = self.client.request(Method::PUT, url).await.json(&body);
        request::send_empty("update cluster", req).await
    }

    /// Deletes a cluster.
    pub async fn delete(&self, id: &str, account_id: &str) -> Result<(), Error> {
        let url = self.client.endpoint(&[PATH, id])?;
        let body = ClusterDeletePayload {
            cluster: ClusterRef {
                id: id.to_string(),
                account_id: account_id.to_string(),
            },
        };
        let req = self.client.request(Method::DELETE, url).await.json(&body);
        request::send_empty("delete cluster", req).await?;

        debug!(id = id, account_id = account_id, "cluster deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_tolerates_sparse_payload() {
        let raw = r#"{
            "cluster": {
                "id": "lkc-1",
                "name": "orders",
                "account_id": "env-1",
                "type": "kafka",
                "prince_per_hour": "0.5",
                "deployment": {
                    "id": "dep-1",
                    "created": "2020-03-01T10:00:00Z",
                    "deactiviated": "0001-01-01T00:00:00Z",
                    "network_access": {"public_internet": null}
                },
                "cku": 2
            }
        }"#;
        let payload: ClusterPayload = serde_json::from_str(raw).unwrap();
        let cluster = payload.cluster;
        assert_eq!(cluster.id, "lkc-1");
        assert_eq!(cluster.cluster_type, "kafka");
        assert_eq!(cluster.price_per_hour, "0.5");
        assert_eq!(cluster.cku, 2);
        assert!(cluster.deployment.created.is_some());
        assert!(cluster.deployment.deactivated.is_some());
        assert!(cluster.deployment.network_access.public_internet.is_empty());
        assert!(!cluster.enterprise);
    }

    #[test]
    fn test_create_config_wire_names() {
        let config = ClusterCreateConfig::new("orders", "env-1", "us-west-2", "aws")
            .sku("BASIC")
            .cku(1);
        let value = serde_json::to_value(ClusterCreatePayload { config }).unwrap();
        let config = &value["config"];
        assert_eq!(config["accountId"], "env-1");
        assert_eq!(config["serviceProvider"], "aws");
        assert_eq!(config["storage"], DEFAULT_STORAGE);
        assert_eq!(config["deployment"]["sku"], "BASIC");
        assert_eq!(config["deployment"]["account_id"], "env-1");
        assert_eq!(config["cku"], 1);
    }

    #[test]
    fn test_delete_payload_shape() {
        let body = ClusterDeletePayload {
            cluster: ClusterRef {
                id: "lkc-1".to_string(),
                account_id: "env-1".to_string(),
            },
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"cluster": {"id": "lkc-1", "accountId": "env-1"}})
        );
    }

    #[test]
    fn test_kafka_api_endpoint() {
        let cluster = Cluster {
            api_endpoint: "https://pkac-1.us-west-2.aws.confluent.cloud".to_string(),
            ..Default::default()
        };
        let url = cluster.kafka_api_endpoint().unwrap();
        assert_eq!(url.host_str(), Some("pkac-1.us-west-2.aws.confluent.cloud"));

        let cluster = Cluster::default();
        assert!(matches!(cluster.kafka_api_endpoint(), Err(Error::Url(_))));
    }

    #[test]
    fn test_null_scalars_decode_as_zero_values() {
        let raw = r#"{"cluster": {"id": "lkc-1", "k8s_cluster_id": null, "price_per_hour": null, "cku": null, "enterprise": null, "deployment": {"id": null, "sku": "BASIC"}}}"#;
        let cluster = serde_json::from_str::<ClusterPayload>(raw).unwrap().cluster;
        assert_eq!(cluster.id, "lkc-1");
        assert!(cluster.k8s_cluster_id.is_empty());
        assert!(cluster.price_per_hour.is_empty());
        assert_eq!(cluster.cku, 0);
        assert!(!cluster.enterprise);
        assert!(cluster.deployment.id.is_empty());
        assert_eq!(cluster.deployment.sku, "BASIC");
    }

    #[test]
    fn test_update_body_uses_corrected_spellings() {
        let raw = r#"{"cluster": {"id": "lkc-1", "prince_per_hour": "0.5", "deployment": {"deactiviated": "2020-03-01T10:00:00Z"}}}"#;
        let payload: ClusterPayload = serde_json::from_str(raw).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        let cluster = &value["cluster"];
        assert_eq!(cluster["price_per_hour"], "0.5");
        assert!(cluster.get("prince_per_hour").is_none());
        assert!(cluster["deployment"].get("deactivated").is_some());
        assert!(cluster["deployment"].get("deactiviated").is_none());
    }
}
