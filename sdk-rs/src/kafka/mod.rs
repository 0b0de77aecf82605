//! The per-cluster Kafka API.
//!
//! Requests against a cluster are not authorized with the session token but
//! with a cluster access token, exchanged for it through `access_tokens`. The
//! cluster API lives below `{api_endpoint}/2.0/kafka/{cluster_id}/`, where
//! `api_endpoint` comes from [crate::cluster::Cluster::api_endpoint].

use crate::{request, Client as SdkClient, Error};
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub mod acl;

pub const ACCESS_TOKENS_PATH: &str = "access_tokens";

/// The path between the API endpoint and the cluster id.
pub const BASE_PATH: [&str; 2] = ["2.0", "kafka"];

/// The (empty) JSON payload of a token exchange.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AccessTokenRequest {}

/// The JSON payload returned by a token exchange.
#[derive(Serialize, Deserialize, Debug)]
pub struct AccessTokenPayload {
    pub token: String,
}

impl SdkClient {
    /// Exchanges the session token for a cluster access token.
    pub async fn kafka_cluster_access_token(&self) -> Result<String, Error> {
        let url = self.endpoint(&[ACCESS_TOKENS_PATH])?;
        let req = self
            .request(Method::POST, url)
            .await
            .json(&AccessTokenRequest::default());
        let payload: AccessTokenPayload = request::send_json("access_tokens", req).await?;
        Ok(payload.token)
    }

    /// Returns a [Client] for the cluster `cluster_id` served at `api_endpoint`.
    ///
    /// A fresh cluster access token is obtained for every call.
    pub async fn kafka_cluster(&self, api_endpoint: &Url, cluster_id: &str) -> Result<Client, Error> {
        let token = self.kafka_cluster_access_token().await?;
        debug!(cluster_id = cluster_id, api_endpoint = %api_endpoint, "obtained cluster access token");
        Client::new(self, api_endpoint, cluster_id, token)
    }
}

/// A client for the Kafka API of a single cluster.
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
    base_url: Url,
    cluster_id: String,
    token: Arc<String>,
}

impl Client {
    /// Creates a new [Client] from a cluster access token.
    ///
    /// Prefer [SdkClient::kafka_cluster], which performs the token exchange.
    pub fn new(
        client: &SdkClient,
        api_endpoint: &Url,
        cluster_id: &str,
        token: String,
    ) -> Result<Self, Error> {
        let segments = [BASE_PATH[0], BASE_PATH[1], cluster_id];
        let mut base_url = request::join(api_endpoint, &segments)?;
        // Keep a trailing slash so the url reads as a directory.
        base_url
            .path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(api_endpoint.to_string()))?
            .push("");

        Ok(Self {
            http_client: client.http_client.clone(),
            base_url,
            cluster_id: cluster_id.to_string(),
            token: Arc::new(token),
        })
    }

    /// Returns the base URL of the cluster API.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the id of the cluster.
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        request::join(&self.base_url, segments)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(self.token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_base_url() {
        let sdk = SdkClient::new("me@example.com", "secret").unwrap();
        for endpoint in [
            "https://pkac-1.us-west-2.aws.confluent.cloud",
            "https://pkac-1.us-west-2.aws.confluent.cloud/",
        ] {
            let endpoint = Url::parse(endpoint).unwrap();
            let client = Client::new(&sdk, &endpoint, "lkc-1", "t".to_string()).unwrap();
            assert_eq!(
                client.base_url().as_str(),
                "https://pkac-1.us-west-2.aws.confluent.cloud/2.0/kafka/lkc-1/"
            );
            assert_eq!(
                client.endpoint(&["acls", "delete"]).unwrap().as_str(),
                "https://pkac-1.us-west-2.aws.confluent.cloud/2.0/kafka/lkc-1/acls/delete"
            );
        }
    }

    #[test]
    fn test_access_token_request_is_empty_object() {
        let value = serde_json::to_value(AccessTokenRequest::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
