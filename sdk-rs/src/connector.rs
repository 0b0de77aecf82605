//! Managed connectors running against a cluster.

use crate::{request, Client as SdkClient, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::collections::BTreeMap;

pub const PATH: &str = "connectors";

/// Connector configuration, as flat string properties.
pub type ConnectorConfig = BTreeMap<String, String>;

/// The identity of a connector.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectorId {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub id_type: String,
}

/// A task of a connector.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectorTask {
    #[serde(rename = "connector")]
    #[serde_as(as = "DefaultOnNull")]
    pub connector_name: String,
    #[serde(rename = "task")]
    #[serde_as(as = "DefaultOnNull")]
    pub task_no: u32,
}

/// The definition of a connector.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectorInfo {
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde_as(as = "DefaultOnNull")]
    pub connector_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub config: ConnectorConfig,
    #[serde_as(as = "DefaultOnNull")]
    pub tasks: Vec<ConnectorTask>,
}

/// A connector as returned by an expanded listing.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Connector {
    pub id: ConnectorId,
    pub info: ConnectorInfo,
}

impl Connector {
    /// Returns the connector name.
    pub fn name(&self) -> &str {
        &self.info.name
    }
}

/// The JSON payload for a create request.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateConnectorPayload {
    pub name: String,
    pub config: ConnectorConfig,
}

/// The JSON payload of an expanded listing, keyed by connector name.
pub type ConnectorsPayload = BTreeMap<String, Connector>;

/// A client for managing connectors.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Lists the connectors of a cluster, ordered by name.
    pub async fn list(&self, account_id: &str, cluster_id: &str) -> Result<Vec<Connector>, Error> {
        let url = self.endpoint(account_id, cluster_id, &[])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("expand", "id,info")]);
        let payload: ConnectorsPayload = request::send_json("connectors", req).await?;
        Ok(payload.into_values().collect())
    }

    /// Creates a connector.
    pub async fn create(
        &self,
        account_id: &str,
        cluster_id: &str,
        name: &str,
        config: ConnectorConfig,
    ) -> Result<ConnectorInfo, Error> {
        let url = self.endpoint(account_id, cluster_id, &[])?;
        let body = CreateConnectorPayload {
            name: name.to_string(),
            config,
        };
        let req = self.client.request(Method::POST, url).await.json(&body);
        request::send_json("create connector", req).await
    }

    /// Replaces the configuration of a connector.
    pub async fn update_config(
        &self,
        account_id: &str,
        cluster_id: &str,
        name: &str,
        config: ConnectorConfig,
    ) -> Result<ConnectorInfo, Error> {
        let url = self.endpoint(account_id, cluster_id, &[name, "config"])?;
        let req = self.client.request(Method::PUT, url).await.json(&config);
        request::send_json("update connector", req).await
    }

    /// Deletes a connector.
    pub async fn delete(&self, account_id: &str, cluster_id: &str, name: &str) -> Result<(), Error> {
        let url = self.endpoint(account_id, cluster_id, &[name])?;
        let req = self.client.request(Method::DELETE, url).await;
        request::send_empty("delete connector", req).await
    }

    fn endpoint(&self, account_id: &str, cluster_id: &str, rest: &[&str]) -> Result<url::Url, Error> {
        let mut segments = vec!["accounts", account_id, "clusters", cluster_id, PATH];
        segments.extend_from_slice(rest);
        self.client.endpoint(&segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_listing_is_ordered() {
        let raw = r#"{
            "sink-b": {"id": {"id": "lcc-2", "id_type": "ID"}, "info": {"name": "sink-b", "type": "sink", "config": {"topics": "t"}, "tasks": null}},
            "source-a": {"id": {"id": "lcc-1", "id_type": "ID"}, "info": {"name": "source-a", "type": "source", "config": {}, "tasks": [{"connector": "source-a", "task": 0}]}}
        }"#;
        let payload: ConnectorsPayload = serde_json::from_str(raw).unwrap();
        let connectors: Vec<Connector> = payload.into_values().collect();
        assert_eq!(connectors.len(), 2);
        assert_eq!(connectors[0].name(), "sink-b");
        assert_eq!(connectors[0].info.config.get("topics").map(String::as_str), Some("t"));
        assert!(connectors[0].info.tasks.is_empty());
        assert_eq!(connectors[1].id.id, "lcc-1");
        assert_eq!(connectors[1].info.tasks[0].connector_name, "source-a");
    }
}
