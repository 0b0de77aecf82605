//! The schema registry of an environment.

use crate::{request, Client as SdkClient, Error};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::debug;

pub const PATH: &str = "schema_registries";

/// The name the control plane gives the registry of an environment.
pub const ACCOUNT_REGISTRY_NAME: &str = "account schema-registry";

/// A schema registry cluster.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SchemaRegistry {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub kafka_cluster_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde_as(as = "DefaultOnNull")]
    pub status: String,
    #[serde_as(as = "DefaultOnNull")]
    pub physical_cluster_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub account_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub organization_id: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub max_schemas: u64,
}

/// The parameters of a new schema registry.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SchemaRegistryRequest {
    pub account_id: String,
    pub kafka_cluster_id: String,
    pub location: String,
    pub name: String,
    pub service_provider: String,
}

/// The JSON payload for a create request.
#[derive(Serialize, Deserialize, Debug)]
pub struct SchemaRegistryCreatePayload {
    pub config: SchemaRegistryRequest,
}

/// The JSON payload wrapping a single registry.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct SchemaRegistryPayload {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub cluster: SchemaRegistry,
}

/// The JSON payload wrapping a list of registries.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct SchemaRegistriesPayload {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub clusters: Vec<SchemaRegistry>,
}

/// A client for managing schema registries.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Retrieves the registry of an environment.
    ///
    /// Returns `Ok(None)` if the environment has none enabled.
    pub async fn get(&self, account_id: &str) -> Result<Option<SchemaRegistry>, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("account_id", account_id)]);
        let payload: SchemaRegistriesPayload =
            request::send_json("get schema registry", req).await?;

        Ok(payload
            .clusters
            .into_iter()
            .find(|registry| registry.name == ACCOUNT_REGISTRY_NAME))
    }

    /// Enables the registry of an environment.
    ///
    /// The environment must contain at least one Kafka cluster. If a registry is
    /// already enabled it is returned unchanged.
    pub async fn create(
        &self,
        account_id: &str,
        location: &str,
        service_provider: &str,
    ) -> Result<SchemaRegistry, Error> {
        let clusters = self.client.clusters().list(account_id).await?;
        if clusters.is_empty() {
            return Err(Error::NoKafkaCluster(account_id.to_string()));
        }

        if let Some(existing) = self.get(account_id).await? {
            debug!(
                account_id = account_id,
                id = %existing.id,
                "schema registry already enabled"
            );
            return Ok(existing);
        }

        let url = self.client.endpoint(&[PATH])?;
        let body = SchemaRegistryCreatePayload {
            config: SchemaRegistryRequest {
                account_id: account_id.to_string(),
                kafka_cluster_id: String::new(),
                location: location.to_string(),
                name: ACCOUNT_REGISTRY_NAME.to_string(),
                service_provider: service_provider.to_string(),
            },
        };
        let req = self
            .client
            .request(Method::POST, url)
            .await
            .query(&[("account_id", account_id)])
            .json(&body);
        let payload: SchemaRegistryPayload =
            request::send_json("create schema registry", req).await?;
        created_registry(payload, account_id)
    }
}

/// Extracts the registry from a create response, which may carry none.
fn created_registry(
    payload: SchemaRegistryPayload,
    account_id: &str,
) -> Result<SchemaRegistry, Error> {
    if payload.cluster.id.is_empty() {
        return Err(Error::NotFound {
            operation: "create schema registry",
            what: format!("registry for environment {account_id}"),
        });
    }
    Ok(payload.cluster)
}
