//! API keys granting access to clusters.

use crate::{request, Client as SdkClient, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::debug;

pub const PATH: &str = "api_keys";

/// A cluster an API key is scoped to.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalCluster {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,
}

impl LogicalCluster {
    /// Scopes a key to the Kafka cluster `id`.
    pub fn kafka(id: &str) -> Self {
        Self {
            id: id.to_string(),
            cluster_type: Some("kafka".to_string()),
        }
    }
}

/// An API key.
///
/// `secret` is only populated in the response to [Client::create].
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ApiKey {
    #[serde_as(as = "DefaultOnNull")]
    pub key: String,
    #[serde_as(as = "DefaultOnNull")]
    pub secret: String,
    #[serde_as(as = "DefaultOnNull")]
    pub hashed_secret: String,
    #[serde_as(as = "DefaultOnNull")]
    pub hashed_function: String,
    #[serde_as(as = "DefaultOnNull")]
    pub sasl_mechanism: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user_id: u64,
    #[serde(rename = "deactived", alias = "deactivated")]
    #[serde_as(as = "DefaultOnNull")]
    pub deactivated: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub id: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub description: String,
    #[serde_as(as = "DefaultOnNull")]
    pub logical_clusters: Vec<LogicalCluster>,
    #[serde_as(as = "DefaultOnNull")]
    pub account_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub service_account: bool,
}

/// The parameters of a new API key.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyCreateRequest {
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// The owner of the key, typically a service account id. Defaults to the session user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub logical_clusters: Vec<LogicalCluster>,
}

/// The JSON payload for a create request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiKeyCreatePayload {
    pub api_key: ApiKeyCreateRequest,
}

/// The JSON payload wrapping a single API key.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiKeyPayload {
    pub api_key: ApiKey,
}

/// The JSON payload wrapping a list of API keys.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiKeysPayload {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

/// The identity of an API key to delete.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiKeyRef {
    pub id: u64,
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub logical_clusters: Vec<LogicalCluster>,
}

/// The JSON payload for a delete request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiKeyDeletePayload {
    pub api_key: ApiKeyRef,
}

/// A client for managing API keys.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Creates an API key. The returned key carries its secret.
    pub async fn create(&self, new_key: ApiKeyCreateRequest) -> Result<ApiKey, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let body = ApiKeyCreatePayload { api_key: new_key };
        let req = self.client.request(Method::POST, url).await.json(&body);
        let payload: ApiKeyPayload = request::send_json("create api key", req).await?;
        Ok(payload.api_key)
    }

    /// Lists the API keys scoped to a cluster.
    pub async fn list(&self, cluster_id: &str, account_id: &str) -> Result<Vec<ApiKey>, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("account_id", account_id), ("cluster_id", cluster_id)]);
        let payload: ApiKeysPayload = request::send_json("api keys", req).await?;
        Ok(payload.api_keys)
    }

    /// Deletes an API key.
    pub async fn delete(
        &self,
        id: u64,
        account_id: &str,
        logical_clusters: Vec<LogicalCluster>,
    ) -> Result<(), Error> {
        let url = self.client.endpoint(&[PATH, &id.to_string()])?;
        let body = ApiKeyDeletePayload {
            api_key: ApiKeyRef {
                id,
                account_id: account_id.to_string(),
                logical_clusters,
            },
        };
        let req = self.client.request(Method::DELETE, url).await.json(&body);
        request::send_empty("delete api key", req).await?;

        debug!(id = id, account_id = account_id, "api key deleted");
        Ok(())
    }
}
