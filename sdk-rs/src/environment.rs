//! Environments, which the API calls accounts.

use crate::{request, Client as SdkClient, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

pub const PATH: &str = "accounts";

/// An environment grouping clusters and their resources.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Environment {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub organization_id: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub deactivated: bool,
}

/// The JSON payload wrapping a single environment.
#[derive(Serialize, Deserialize, Debug)]
pub struct EnvironmentPayload {
    pub account: Environment,
}

/// The JSON payload wrapping a list of environments.
#[derive(Serialize, Deserialize, Debug)]
pub struct EnvironmentsPayload {
    #[serde(default)]
    pub accounts: Vec<Environment>,
}

/// The fields sent when creating or updating an environment.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnvironmentRequest {
    pub name: String,
    pub organization_id: u64,
}

/// The JSON payload for create and update requests.
#[derive(Serialize, Deserialize, Debug)]
pub struct EnvironmentRequestPayload {
    pub account: EnvironmentRequest,
}

/// A client for managing environments.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Retrieves an environment by id.
    pub async fn get(&self, id: &str) -> Result<Environment, Error> {
        let url = self.client.endpoint(&[PATH, id])?;
        let req = self.client.request(Method::GET, url).await;
        let payload: EnvironmentPayload = request::send_json("get environment", req).await?;
        Ok(payload.account)
    }

    /// Lists every environment visible to the session.
    pub async fn list(&self) -> Result<Vec<Environment>, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let req = self.client.request(Method::GET, url).await;
        let payload: EnvironmentsPayload = request::send_json("get environments", req).await?;
        Ok(payload.accounts)
    }

    /// Creates an environment in the given organization.
    pub async fn create(&self, name: &str, organization_id: u64) -> Result<Environment, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let body = Self::body(name, organization_id);
        let req = self.client.request(Method::POST, url).await.json(&body);
        let payload: EnvironmentPayload = request::send_json("create environment", req).await?;
        Ok(payload.account)
    }

    /// Renames an environment.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        organization_id: u64,
    ) -> Result<Environment, Error> {
        let url = self.client.endpoint(&[PATH, id])?;
        let body = Self::body(name, organization_id);
        let req = self.client.request(Method::PUT, url).await.json(&body);
        let payload: EnvironmentPayload = request::send_json("update environment", req).await?;
        Ok(payload.account)
    }

    /// Deletes an environment.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let url = self.client.endpoint(&[PATH, id])?;
        let req = self.client.request(Method::DELETE, url).await;
        request::send_empty("delete environment", req).await
    }

    fn body(name: &str, organization_id: u64) -> EnvironmentRequestPayload {
        EnvironmentRequestPayload {
            account: EnvironmentRequest {
                name: name.to_string(),
                organization_id,
            },
        }
    }
}
