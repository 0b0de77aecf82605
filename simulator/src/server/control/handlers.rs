use super::Error;
use crate::server::state::{Simulation, DEFAULT_ENVIRONMENT_ID, ORGANIZATION_ID, USER_ID};
use axum::{
    extract::{Path, Query, State},
    http::{header::USER_AGENT, HeaderMap},
    response::Json,
};
use ccloud_sdk::cluster::{
    Cluster, ClusterCreatePayload, ClusterDeletePayload, ClusterPayload, ClustersPayload,
    Deployment,
};
use ccloud_sdk::environment::{
    Environment, EnvironmentPayload, EnvironmentRequestPayload, EnvironmentsPayload,
};
use ccloud_sdk::kafka::{AccessTokenPayload, AccessTokenRequest};
use ccloud_sdk::metadata::{Cloud, EnvMetadata, Region, SchemaRegistryLocation};
use ccloud_sdk::session::{Account, AuthPayload, TokenPayload, UserInfo};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// The sku given to clusters created without one.
const DEFAULT_SKU: &str = "BASIC";

/// The durability given to clusters created without one.
const DEFAULT_DURABILITY: &str = "LOW";

/// Query parameters scoping a request to an environment.
#[derive(Deserialize)]
pub(super) struct AccountParams {
    account_id: Option<String>,
}

impl AccountParams {
    fn required(self) -> Result<String, Error> {
        self.account_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::BadRequest("account_id is required".to_string()))
    }
}

/// Issues a session token for the configured account.
pub(super) async fn login(
    State(state): State<Simulation>,
    Json(auth): Json<AuthPayload>,
) -> Result<Json<TokenPayload>, Error> {
    debug!(operation = "login", email = %auth.email, "processing login request");

    if auth.email != *state.email || auth.password != *state.password {
        return Err(Error::InvalidCredentials);
    }

    let token = state.sessions.issue(32);
    Ok(Json(TokenPayload { token }))
}

/// Describes the logged in account.
///
/// The user carries the `User-Agent` the request was made with.
pub(super) async fn me(
    State(state): State<Simulation>,
    headers: HeaderMap,
) -> Result<Json<UserInfo>, Error> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let environment = state
        .environments
        .get(DEFAULT_ENVIRONMENT_ID)
        .map(|env| env.value().clone())
        .ok_or_else(|| Error::NotFound(format!("environment {DEFAULT_ENVIRONMENT_ID}")))?;

    Ok(Json(UserInfo {
        account: Account {
            id: environment.id,
            name: environment.name,
            organization_id: environment.organization_id,
        },
        organization: json!({ "id": ORGANIZATION_ID, "name": "simulated" }),
        user: json!({
            "id": USER_ID,
            "email": state.email.as_str(),
            "user_agent": user_agent,
        }),
    }))
}

pub(super) async fn list_environments(
    State(state): State<Simulation>,
) -> Json<EnvironmentsPayload> {
    let mut accounts: Vec<Environment> = state
        .environments
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    accounts.sort_by(|a, b| a.id.cmp(&b.id));
    Json(EnvironmentsPayload { accounts })
}

pub(super) async fn create_environment(
    State(state): State<Simulation>,
    Json(payload): Json<EnvironmentRequestPayload>,
) -> Result<Json<EnvironmentPayload>, Error> {
    let request = payload.account;
    if request.name.is_empty() {
        return Err(Error::BadRequest("name is required".to_string()));
    }

    let environment = Environment {
        id: state.next_resource_id("env"),
        name: request.name,
        organization_id: request.organization_id,
        deactivated: false,
    };
    state
        .environments
        .insert(environment.id.clone(), environment.clone());

    debug!(operation = "create_environment", id = %environment.id, "environment created");
    Ok(Json(EnvironmentPayload {
        account: environment,
    }))
}

pub(super) async fn get_environment(
    State(state): State<Simulation>,
    Path(id): Path<String>,
) -> Result<Json<EnvironmentPayload>, Error> {
    let environment = state
        .environments
        .get(&id)
        .map(|env| env.value().clone())
        .ok_or_else(|| Error::NotFound(format!("environment {id}")))?;
    Ok(Json(EnvironmentPayload {
        account: environment,
    }))
}

pub(super) async fn update_environment(
    State(state): State<Simulation>,
    Path(id): Path<String>,
    Json(payload): Json<EnvironmentRequestPayload>,
) -> Result<Json<EnvironmentPayload>, Error> {
    let request = payload.account;
    if request.name.is_empty() {
        return Err(Error::BadRequest("name is required".to_string()));
    }

    let mut environment = state
        .environments
        .get_mut(&id)
        .ok_or_else(|| Error::NotFound(format!("environment {id}")))?;
    environment.name = request.name;
    environment.organization_id = request.organization_id;

    Ok(Json(EnvironmentPayload {
        account: environment.clone(),
    }))
}

pub(super) async fn delete_environment(
    State(state): State<Simulation>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    if !state.environments.contains_key(&id) {
        return Err(Error::NotFound(format!("environment {id}")));
    }
    if state.clusters.iter().any(|cluster| cluster.account_id == id) {
        return Err(Error::Conflict(format!("environment {id} still has clusters")));
    }

    state.environments.remove(&id);
    state.schema_registries.remove(&id);
    debug!(operation = "delete_environment", id = %id, "environment deleted");
    Ok(Json(json!({})))
}

pub(super) async fn list_clusters(
    State(state): State<Simulation>,
    Query(params): Query<AccountParams>,
) -> Result<Json<ClustersPayload>, Error> {
    let account_id = params.required()?;
    let mut clusters: Vec<Cluster> = state
        .clusters
        .iter()
        .filter(|cluster| cluster.account_id == account_id)
        .map(|cluster| cluster.value().clone())
        .collect();
    clusters.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(ClustersPayload { clusters }))
}

pub(super) async fn create_cluster(
    State(state): State<Simulation>,
    Json(payload): Json<ClusterCreatePayload>,
) -> Result<Json<ClusterPayload>, Error> {
    let config = payload.config;
    if config.name.is_empty() {
        return Err(Error::BadRequest("name is required".to_string()));
    }
    let organization_id = state
        .environments
        .get(&config.account_id)
        .map(|env| env.organization_id)
        .ok_or_else(|| Error::NotFound(format!("environment {}", config.account_id)))?;

    let id = state.next_resource_id("lkc");
    let now = Utc::now();
    let sku = if config.deployment.sku.is_empty() {
        DEFAULT_SKU.to_string()
    } else {
        config.deployment.sku
    };
    let durability = if config.durability.is_empty() {
        DEFAULT_DURABILITY.to_string()
    } else {
        config.durability
    };

    let cluster = Cluster {
        id: id.clone(),
        name: config.name,
        account_id: config.account_id.clone(),
        network_ingress: config.network_ingress,
        network_egress: config.network_egress,
        storage: config.storage,
        durability,
        status: "UP".to_string(),
        endpoint: format!("SASL_SSL://{id}.{}.{}:9092", config.region, config.service_provider),
        region: config.region,
        service_provider: config.service_provider,
        organization_id,
        cluster_type: "kafka".to_string(),
        api_endpoint: state.api_endpoint.to_string(),
        is_schedulable: true,
        dedicated: config.cku > 0,
        max_network_ingress: config.network_ingress,
        max_network_egress: config.network_egress,
        deployment: Deployment {
            id: state.next_resource_id("dep"),
            created: Some(now),
            modified: Some(now),
            account_id: config.account_id,
            sku,
            ..Default::default()
        },
        cku: config.cku,
        ..Default::default()
    };
    state.clusters.insert(id, cluster.clone());

    debug!(operation = "create_cluster", id = %cluster.id, "cluster created");
    Ok(Json(ClusterPayload { cluster }))
}

pub(super) async fn get_cluster(
    State(state): State<Simulation>,
    Path(id): Path<String>,
    Query(params): Query<AccountParams>,
) -> Result<Json<ClusterPayload>, Error> {
    let account_id = params.required()?;
    let cluster = state
        .clusters
        .get(&id)
        .filter(|cluster| cluster.account_id == account_id)
        .map(|cluster| cluster.value().clone())
        .ok_or_else(|| Error::NotFound(format!("cluster {id}")))?;
    Ok(Json(ClusterPayload { cluster }))
}

pub(super) async fn update_cluster(
    State(state): State<Simulation>,
    Path(id): Path<String>,
    Json(payload): Json<ClusterPayload>,
) -> Result<Json<ClusterPayload>, Error> {
    let update = payload.cluster;
    if update.name.is_empty() {
        return Err(Error::BadRequest("name is required".to_string()));
    }

    let mut cluster = state
        .clusters
        .get_mut(&id)
        .filter(|cluster| cluster.account_id == update.account_id)
        .ok_or_else(|| Error::NotFound(format!("cluster {id}")))?;
    cluster.name = update.name;
    cluster.deployment.modified = Some(Utc::now());

    Ok(Json(ClusterPayload {
        cluster: cluster.clone(),
    }))
}

pub(super) async fn delete_cluster(
    State(state): State<Simulation>,
    Path(id): Path<String>,
    Json(payload): Json<ClusterDeletePayload>,
) -> Result<Json<serde_json::Value>, Error> {
    let target = payload.cluster;
    if target.id != id {
        return Err(Error::BadRequest(format!(
            "cluster id {} does not match path {id}",
            target.id
        )));
    }
    if !state.cluster_in(&id, &target.account_id) {
        return Err(Error::NotFound(format!("cluster {id}")));
    }

    state.clusters.remove(&id);
    state.connectors.remove(&id);
    state.acls.remove(&id);
    debug!(operation = "delete_cluster", id = %id, "cluster deleted");
    Ok(Json(json!({})))
}

/// Describes the clouds and regions clusters can be placed in.
pub(super) async fn env_metadata(
    Query(params): Query<AccountParams>,
) -> Json<EnvMetadata> {
    debug!(operation = "env_metadata", account_id = ?params.account_id, "processing metadata request");

    let region = |cloud: &str, id: &str, name: &str| Region {
        id: id.to_string(),
        cloud: cloud.to_string(),
        zones: Vec::new(),
        name: name.to_string(),
        is_schedulable: true,
        is_multizone_enabled: true,
    };
    let location = |id: &str, name: &str, provider: &str| SchemaRegistryLocation {
        id: id.to_string(),
        name: name.to_string(),
        cluster_id: format!("lsrc-{id}"),
        service_provider: provider.to_string(),
    };

    Json(EnvMetadata {
        clouds: vec![
            Cloud {
                id: "aws".to_string(),
                regions: vec![
                    region("aws", "us-west-2", "us-west-2 (Oregon)"),
                    region("aws", "eu-west-1", "eu-west-1 (Ireland)"),
                ],
                name: "Amazon Web Services".to_string(),
            },
            Cloud {
                id: "gcp".to_string(),
                regions: vec![region("gcp", "us-central1", "us-central1 (Iowa)")],
                name: "Google Cloud Platform".to_string(),
            },
        ],
        schema_registry_locations: vec![
            location("us", "US", "aws"),
            location("eu", "EU", "aws"),
        ],
    })
}

/// Issues a cluster access token in exchange for the session.
pub(super) async fn create_access_token(
    State(state): State<Simulation>,
    Json(_): Json<AccessTokenRequest>,
) -> Json<AccessTokenPayload> {
    let token = state.access_tokens.issue(48);
    debug!(operation = "create_access_token", "cluster access token issued");
    Json(AccessTokenPayload { token })
}
