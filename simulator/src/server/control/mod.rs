//! The control-plane API: sessions, environments, clusters, credentials and services.

use crate::server::{auth, Simulation};
use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use ccloud_sdk::{ErrorMessage, ErrorPayload};
use thiserror::Error;
use tracing::{info, warn};

mod credentials;
mod handlers;
mod services;

/// Application-specific errors for the control-plane handlers.
///
/// Every error is rendered as the provider's `{"error": {"code", "message"}}` envelope.
#[derive(Debug, Error)]
pub(super) enum Error {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
        };
        warn!(error = %self, status = %status, "request failed");

        let payload = ErrorPayload {
            error: ErrorMessage {
                code: i64::from(status.as_u16()),
                message: self.to_string(),
            },
        };
        (status, Json(payload)).into_response()
    }
}

impl auth::RequireAuth for Simulation {
    fn is_authorized(&self, token: &str) -> bool {
        self.sessions.contains(token)
    }

    fn unauthorized(&self) -> Response {
        Error::Unauthorized.into_response()
    }
}

/// Creates a new `Router` for the control-plane endpoints.
///
/// Everything but `sessions` requires a session token.
pub fn router(state: Simulation) -> Router {
    info!("initializing control plane module");

    let authenticated = Router::new()
        .route("/me", get(handlers::me))
        .route(
            "/accounts",
            get(handlers::list_environments).post(handlers::create_environment),
        )
        .route(
            "/accounts/{id}",
            get(handlers::get_environment)
                .put(handlers::update_environment)
                .delete(handlers::delete_environment),
        )
        .route(
            "/clusters",
            get(handlers::list_clusters).post(handlers::create_cluster),
        )
        .route(
            "/clusters/{id}",
            get(handlers::get_cluster)
                .put(handlers::update_cluster)
                .delete(handlers::delete_cluster),
        )
        .route("/env_metadata", get(handlers::env_metadata))
        .route("/access_tokens", post(handlers::create_access_token))
        .route(
            "/api_keys",
            get(credentials::list_api_keys).post(credentials::create_api_key),
        )
        .route("/api_keys/{id}", delete(credentials::delete_api_key))
        .route(
            "/service_accounts",
            get(credentials::list_service_accounts)
                .post(credentials::create_service_account)
                .delete(credentials::delete_service_account),
        )
        .route(
            "/accounts/{account_id}/clusters/{cluster_id}/connectors",
            get(services::list_connectors).post(services::create_connector),
        )
        .route(
            "/accounts/{account_id}/clusters/{cluster_id}/connectors/{name}",
            delete(services::delete_connector),
        )
        .route(
            "/accounts/{account_id}/clusters/{cluster_id}/connectors/{name}/config",
            put(services::update_connector_config),
        )
        .route(
            "/schema_registries",
            get(services::get_schema_registries).post(services::create_schema_registry),
        )
        .layer(from_fn_with_state(
            state.clone(),
            auth::middleware::<Simulation>,
        ));

    let router = Router::new()
        .route("/sessions", post(handlers::login))
        .merge(authenticated)
        .with_state(state);

    info!("control plane module initialized successfully");
    router
}
