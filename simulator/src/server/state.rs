//! In-memory state shared by the control-plane and cluster routes.

use ccloud_sdk::api_key::ApiKey;
use ccloud_sdk::cluster::Cluster;
use ccloud_sdk::connector::Connector;
use ccloud_sdk::environment::Environment;
use ccloud_sdk::kafka::acl::AclBinding;
use ccloud_sdk::schema_registry::SchemaRegistry;
use ccloud_sdk::service_account::ServiceAccount;
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The organization every simulated environment belongs to.
pub const ORGANIZATION_ID: u64 = 1;

/// The id of the environment that exists from startup.
pub const DEFAULT_ENVIRONMENT_ID: &str = "env-0";

/// The user id of the logged in account.
pub const USER_ID: u64 = 1;

/// The number of tokens of each kind kept before the oldest are revoked.
pub const DEFAULT_TOKEN_LIMIT: u64 = 1024;

/// Issued bearer tokens. Only the most recent `limit` stay valid.
pub struct Tokens {
    issued: DashMap<String, u64>,
    next: AtomicU64,
    limit: u64,
}

impl Tokens {
    /// Creates an empty set keeping at most `limit` tokens.
    pub fn new(limit: u64) -> Self {
        Self {
            issued: DashMap::new(),
            next: AtomicU64::new(0),
            limit: limit.max(1),
        }
    }

    /// Issues a random token of `len` characters, revoking the oldest ones beyond the limit.
    pub fn issue(&self, len: usize) -> String {
        let token = random_string(len);
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        self.issued.insert(token.clone(), seq);

        if self.issued.len() as u64 > self.limit {
            let oldest = (seq + 1).saturating_sub(self.limit);
            self.issued.retain(|_, issued| *issued >= oldest);
        }
        token
    }

    /// Returns true if `token` was issued and not yet revoked.
    pub fn contains(&self, token: &str) -> bool {
        self.issued.contains_key(token)
    }

    /// Returns the number of valid tokens.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Returns true if no token is valid.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

/// The state of a simulated control plane.
#[derive(Clone)]
pub struct Simulation {
    /// The account email accepted by `sessions`.
    pub email: Arc<String>,
    /// The account password accepted by `sessions`.
    pub password: Arc<String>,
    /// The address advertised as `api_endpoint` of every cluster.
    pub api_endpoint: Arc<String>,
    /// Issued session tokens.
    pub sessions: Arc<Tokens>,
    /// Issued cluster access tokens.
    pub access_tokens: Arc<Tokens>,
    /// Environments by id.
    pub environments: Arc<DashMap<String, Environment>>,
    /// Clusters by id.
    pub clusters: Arc<DashMap<String, Cluster>>,
    /// API keys by id.
    pub api_keys: Arc<DashMap<u64, ApiKey>>,
    /// Service accounts by id.
    pub service_accounts: Arc<DashMap<u64, ServiceAccount>>,
    /// Connectors by cluster id, then by name.
    pub connectors: Arc<DashMap<String, BTreeMap<String, Connector>>>,
    /// Schema registries by environment id.
    pub schema_registries: Arc<DashMap<String, SchemaRegistry>>,
    /// ACLs by cluster id.
    pub acls: Arc<DashMap<String, Vec<AclBinding>>>,
    next_id: Arc<AtomicU64>,
}

impl Simulation {
    /// Creates a control plane holding only the default environment.
    pub fn new(email: Arc<String>, password: Arc<String>, api_endpoint: Arc<String>) -> Self {
        let environments = DashMap::new();
        environments.insert(
            DEFAULT_ENVIRONMENT_ID.to_string(),
            Environment {
                id: DEFAULT_ENVIRONMENT_ID.to_string(),
                name: "default".to_string(),
                organization_id: ORGANIZATION_ID,
                deactivated: false,
            },
        );

        Self {
            email,
            password,
            api_endpoint,
            sessions: Arc::new(Tokens::new(DEFAULT_TOKEN_LIMIT)),
            access_tokens: Arc::new(Tokens::new(DEFAULT_TOKEN_LIMIT)),
            environments: Arc::new(environments),
            clusters: Arc::new(DashMap::new()),
            api_keys: Arc::new(DashMap::new()),
            service_accounts: Arc::new(DashMap::new()),
            connectors: Arc::new(DashMap::new()),
            schema_registries: Arc::new(DashMap::new()),
            acls: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Replaces the number of tokens of each kind kept valid.
    pub fn with_token_limit(mut self, limit: u64) -> Self {
        self.sessions = Arc::new(Tokens::new(limit));
        self.access_tokens = Arc::new(Tokens::new(limit));
        self
    }

    /// Returns a fresh numeric id.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns a fresh id of the form `{prefix}-{n}`.
    pub fn next_resource_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id())
    }

    /// Returns true if `cluster_id` exists and belongs to `account_id`.
    pub fn cluster_in(&self, cluster_id: &str, account_id: &str) -> bool {
        self.clusters
            .get(cluster_id)
            .is_some_and(|cluster| cluster.account_id == account_id)
    }
}

/// Returns a random alphanumeric string of `len` characters.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_revoke_oldest() {
        let tokens = Tokens::new(2);
        let first = tokens.issue(16);
        let second = tokens.issue(16);
        assert!(tokens.contains(&first));
        assert!(tokens.contains(&second));

        let third = tokens.issue(16);
        assert_eq!(tokens.len(), 2);
        assert!(!tokens.contains(&first));
        assert!(tokens.contains(&second));
        assert!(tokens.contains(&third));
        assert!(!tokens.contains("unknown"));
    }

    #[test]
    fn test_token_limit_is_per_kind() {
        let state = Simulation::new(
            Arc::new("dev@example.com".to_string()),
            Arc::new("secret".to_string()),
            Arc::new("http://127.0.0.1:8080".to_string()),
        )
        .with_token_limit(1);

        let session = state.sessions.issue(32);
        let access = state.access_tokens.issue(48);
        assert!(state.sessions.contains(&session));
        assert!(state.access_tokens.contains(&access));

        let newer = state.sessions.issue(32);
        assert!(!state.sessions.contains(&session));
        assert!(state.sessions.contains(&newer));
        assert!(state.access_tokens.contains(&access));
    }
}
