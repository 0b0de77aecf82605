use super::Error;
use crate::server::state::{random_string, Simulation, USER_ID};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use ccloud_sdk::api_key::{
    ApiKey, ApiKeyCreatePayload, ApiKeyDeletePayload, ApiKeyPayload, ApiKeysPayload,
};
use ccloud_sdk::service_account::{
    ServiceAccount, ServiceAccountCreatePayload, ServiceAccountDeletePayload,
    ServiceAccountPayload, ServiceAccountsPayload,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Query parameters for credential listings.
#[derive(Deserialize)]
pub(super) struct ListParams {
    account_id: Option<String>,
    cluster_id: Option<String>,
}

pub(super) async fn create_api_key(
    State(state): State<Simulation>,
    Json(payload): Json<ApiKeyCreatePayload>,
) -> Result<Json<ApiKeyPayload>, Error> {
    let request = payload.api_key;
    if !state.environments.contains_key(&request.account_id) {
        return Err(Error::NotFound(format!(
            "environment {}",
            request.account_id
        )));
    }
    if request.logical_clusters.is_empty() {
        return Err(Error::BadRequest(
            "at least one logical cluster is required".to_string(),
        ));
    }
    for cluster in &request.logical_clusters {
        if !state.cluster_in(&cluster.id, &request.account_id) {
            return Err(Error::NotFound(format!("cluster {}", cluster.id)));
        }
    }
    let service_account = match request.user_id {
        Some(user_id) if user_id != USER_ID => {
            if !state.service_accounts.contains_key(&user_id) {
                return Err(Error::NotFound(format!("user {user_id}")));
            }
            true
        }
        _ => false,
    };

    let api_key = ApiKey {
        key: random_string(16).to_uppercase(),
        secret: random_string(64),
        hashed_secret: random_string(44),
        hashed_function: "BCrypt".to_string(),
        sasl_mechanism: "PLAIN".to_string(),
        user_id: request.user_id.unwrap_or(USER_ID),
        deactivated: false,
        id: state.next_id(),
        description: request.description,
        logical_clusters: request.logical_clusters,
        account_id: request.account_id,
        service_account,
    };

    // The secret is only ever handed out once.
    let stored = ApiKey {
        secret: String::new(),
        ..api_key.clone()
    };
    state.api_keys.insert(api_key.id, stored);

    debug!(operation = "create_api_key", id = api_key.id, "api key created");
    Ok(Json(ApiKeyPayload { api_key }))
}

pub(super) async fn list_api_keys(
    State(state): State<Simulation>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiKeysPayload>, Error> {
    let account_id = params
        .account_id
        .ok_or_else(|| Error::BadRequest("account_id is required".to_string()))?;

    let mut api_keys: Vec<ApiKey> = state
        .api_keys
        .iter()
        .filter(|key| key.account_id == account_id)
        .filter(|key| match &params.cluster_id {
            Some(cluster_id) => key.logical_clusters.iter().any(|c| &c.id == cluster_id),
            None => true,
        })
        .map(|key| key.value().clone())
        .collect();
    api_keys.sort_by_key(|key| key.id);
    Ok(Json(ApiKeysPayload { api_keys }))
}

pub(super) async fn delete_api_key(
    State(state): State<Simulation>,
    Path(id): Path<u64>,
    Json(payload): Json<ApiKeyDeletePayload>,
) -> Result<Json<serde_json::Value>, Error> {
    let target = payload.api_key;
    if target.id != id {
        return Err(Error::BadRequest(format!(
            "api key id {} does not match path {id}",
            target.id
        )));
    }

    state
        .api_keys
        .remove_if(&id, |_, key| key.account_id == target.account_id)
        .ok_or_else(|| Error::NotFound(format!("api key {id}")))?;

    debug!(operation = "delete_api_key", id = id, "api key deleted");
    Ok(Json(json!({})))
}

pub(super) async fn create_service_account(
    State(state): State<Simulation>,
    Json(payload): Json<ServiceAccountCreatePayload>,
) -> Result<Json<ServiceAccountPayload>, Error> {
    let request = payload.user;
    if request.name.is_empty() {
        return Err(Error::BadRequest("service_name is required".to_string()));
    }
    if state
        .service_accounts
        .iter()
        .any(|account| account.name == request.name)
    {
        return Err(Error::Conflict(format!(
            "service account {} already exists",
            request.name
        )));
    }

    let user = ServiceAccount {
        id: state.next_id(),
        name: request.name,
        description: request.description,
    };
    state.service_accounts.insert(user.id, user.clone());

    debug!(operation = "create_service_account", id = user.id, "service account created");
    Ok(Json(ServiceAccountPayload { user }))
}

pub(super) async fn list_service_accounts(
    State(state): State<Simulation>,
    Query(params): Query<ListParams>,
) -> Json<ServiceAccountsPayload> {
    debug!(
        operation = "list_service_accounts",
        account_id = ?params.account_id,
        cluster_id = ?params.cluster_id,
        "processing list request"
    );

    let mut users: Vec<ServiceAccount> = state
        .service_accounts
        .iter()
        .map(|account| account.value().clone())
        .collect();
    users.sort_by_key(|account| account.id);
    Json(ServiceAccountsPayload { users })
}

pub(super) async fn delete_service_account(
    State(state): State<Simulation>,
    Json(payload): Json<ServiceAccountDeletePayload>,
) -> Result<Json<serde_json::Value>, Error> {
    let id = payload.user.id;
    state
        .service_accounts
        .remove(&id)
        .ok_or_else(|| Error::NotFound(format!("service account {id}")))?;

    debug!(operation = "delete_service_account", id = id, "service account deleted");
    Ok(Json(json!({})))
}
