//! Service accounts, which the API exposes as users.

use crate::{request, Client as SdkClient, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

pub const PATH: &str = "service_accounts";

/// A service account.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceAccount {
    #[serde_as(as = "DefaultOnNull")]
    pub id: u64,
    #[serde(rename = "service_name")]
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde(rename = "service_description")]
    #[serde_as(as = "DefaultOnNull")]
    pub description: String,
}

/// The parameters of a new service account.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServiceAccountCreateRequest {
    #[serde(rename = "service_name")]
    pub name: String,
    #[serde(rename = "service_description")]
    pub description: String,
}

/// The JSON payload for a create request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ServiceAccountCreatePayload {
    pub user: ServiceAccountCreateRequest,
}

/// The JSON payload wrapping a single service account.
#[derive(Serialize, Deserialize, Debug)]
pub struct ServiceAccountPayload {
    pub user: ServiceAccount,
}

/// The JSON payload wrapping a list of service accounts.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct ServiceAccountsPayload {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub users: Vec<ServiceAccount>,
}

/// The identity of a service account to delete.
#[derive(Serialize, Deserialize, Debug)]
pub struct ServiceAccountRef {
    pub id: u64,
}

/// The JSON payload for a delete request.
#[derive(Serialize, Deserialize, Debug)]
pub struct ServiceAccountDeletePayload {
    pub user: ServiceAccountRef,
}

/// A client for managing service accounts.
#[derive(Clone)]
pub struct Client {
    client: SdkClient,
}

impl Client {
    /// Creates a new [Client].
    pub fn new(client: SdkClient) -> Self {
        Self { client }
    }

    /// Creates a service account.
    pub async fn create(&self, name: &str, description: &str) -> Result<ServiceAccount, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let body = ServiceAccountCreatePayload {
            user: ServiceAccountCreateRequest {
                name: name.to_string(),
                description: description.to_string(),
            },
        };
        let req = self.client.request(Method::POST, url).await.json(&body);
        let payload: ServiceAccountPayload =
            request::send_json("create service account", req).await?;
        Ok(payload.user)
    }

    /// Lists service accounts.
    pub async fn list(
        &self,
        cluster_id: &str,
        account_id: &str,
    ) -> Result<Vec<ServiceAccount>, Error> {
        let url = self.client.endpoint(&[PATH])?;
        let req = self
            .client
            .request(Method::GET, url)
            .await
            .query(&[("account_id", account_id), ("cluster_id", cluster_id)]);
        let payload: ServiceAccountsPayload = request::send_json("service accounts", req).await?;
        Ok(payload.users)
    }

    /// Deletes a service account. The id travels in the body, not the path.
    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        let url = self.client.endpoint(&[PATH])?;
        let body = ServiceAccountDeletePayload {
            user: ServiceAccountRef { id },
        };
        let req = self.client.request(Method::DELETE, url).await.json(&body);
        request::send_empty("delete service account", req).await
    }
}
