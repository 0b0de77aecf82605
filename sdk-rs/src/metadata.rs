//! Cloud providers, regions and schema registry locations.

use crate::{request, Client as SdkClient, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

pub const PATH: &str = "env_metadata";

/// A region of a cloud provider.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Region {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub cloud: String,
    #[serde_as(as = "DefaultOnNull")]
    pub zones: Vec<serde_json::Value>,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub is_schedulable: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_multizone_enabled: bool,
}

/// A cloud provider and the regions it offers.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Cloud {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub regions: Vec<Region>,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
}

/// A location where a schema registry can be enabled.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SchemaRegistryLocation {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub cluster_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub service_provider: String,
}

/// The JSON payload returned by `env_metadata`.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EnvMetadata {
    #[serde_as(as = "DefaultOnNull")]
    pub clouds: Vec<Cloud>,
    #[serde_as(as = "DefaultOnNull")]
    pub schema_registry_locations: Vec<SchemaRegistryLocation>,
}

impl EnvMetadata {
    /// Returns the cloud with the given id, e.g. `aws`.
    pub fn cloud(&self, id: &str) -> Option<&Cloud> {
        self.clouds.iter().find(|cloud| cloud.id == id)
    }
}

/// A client for reading cloud metadata.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Retrieves the clouds, regions and schema registry locations available to an environment.
    pub async fn get(&self, account_id: &str) -> Result<EnvMetadata, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("account_id", account_id)]);
        request::send_json("env_metadata", req).await
    }
}
