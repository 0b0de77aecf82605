//! Rust SDK for the Confluent Cloud control-plane API.
//!
//! Resource APIs are reached through the [Client]:
//! - environments: accounts that group clusters.
//! - clusters: Kafka cluster provisioning.
//! - api_keys, service_accounts: credentials.
//! - connectors, schema_registries: managed services attached to a cluster.
//! - kafka: the per-cluster API, authorized with a delegated cluster token.

pub mod api_key;
pub mod cluster;
pub mod config;
pub mod connector;
pub mod environment;
mod error;
pub mod kafka;
pub mod metadata;
mod request;
pub mod schema_registry;
pub mod service_account;
pub mod session;

pub use config::Config;
pub use error::{Error, ErrorMessage, ErrorPayload};

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// The client for interacting with the Confluent Cloud API.
///
/// Clones share the session token, so a [Client::login] on one clone
/// authenticates all of them.
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
    base_url: Url,
    email: Arc<String>,
    password: Arc<String>,
    token: Arc<RwLock<Option<String>>>,
}

impl Client {
    /// Creates a new [Client] against the default base URL.
    ///
    /// # Arguments
    ///
    /// * `email` - The account email used by [Client::login].
    /// * `password` - The account password used by [Client::login].
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(Config::new(email, password))
    }

    /// Creates a new [Client] from a [Config].
    pub fn with_config(config: Config) -> Result<Self, Error> {
        let base_url = config.parse_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("user agent: {e}")))?,
        );
        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
            email: Arc::new(config.email),
            password: Arc::new(config.password),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Uses a session token obtained elsewhere instead of calling [Client::login].
    pub async fn set_session_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Returns the current session token, if the client has logged in.
    pub async fn session_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Returns the base URL of the control plane.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns an [environment::Client] for managing environments.
    pub fn environments(&self) -> environment::Client {
        environment::Client::new(self.clone())
    }

    /// Returns a [cluster::Client] for managing Kafka clusters.
    pub fn clusters(&self) -> cluster::Client {
        cluster::Client::new(self.clone())
    }

    /// Returns an [api_key::Client] for managing API keys.
    pub fn api_keys(&self) -> api_key::Client {
        api_key::Client::new(self.clone())
    }

    /// Returns a [service_account::Client] for managing service accounts.
    pub fn service_accounts(&self) -> service_account::Client {
        service_account::Client::new(self.clone())
    }

    /// Returns a [connector::Client] for managing connectors.
    pub fn connectors(&self) -> connector::Client {
        connector::Client::new(self.clone())
    }

    /// Returns a [schema_registry::Client] for managing schema registries.
    pub fn schema_registries(&self) -> schema_registry::Client {
        schema_registry::Client::new(self.clone())
    }

    /// Returns a [metadata::Client] for reading cloud metadata.
    pub fn metadata(&self) -> metadata::Client {
        metadata::Client::new(self.clone())
    }

    /// Resolves an endpoint below the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        request::join(&self.base_url, segments)
    }

    /// Starts a request carrying the session token, if any.
    pub(crate) async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}
