//! The per-cluster Kafka API, authorized with cluster access tokens.

use crate::server::{auth, Simulation};
use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, post},
    Router,
};
use thiserror::Error;
use tracing::{info, warn};

mod handlers;

/// Errors returned by the cluster API.
///
/// Unlike the control plane, failures are reported as plain text.
#[derive(Debug, Error)]
pub(super) enum Error {
    #[error("unauthorized")]
    Unauthorized,
    #[error("cluster {0} not found")]
    ClusterNotFound(String),
    #[error("{0}")]
    InvalidAcl(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::ClusterNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidAcl(_) => StatusCode::BAD_REQUEST,
        };
        warn!(error = %self, status = %status, "cluster request failed");
        (status, self.to_string()).into_response()
    }
}

/// The state for the cluster routes.
#[derive(Clone)]
pub struct KafkaState(pub Simulation);

impl auth::RequireAuth for KafkaState {
    fn is_authorized(&self, token: &str) -> bool {
        self.0.access_tokens.contains(token)
    }

    fn unauthorized(&self) -> Response {
        Error::Unauthorized.into_response()
    }
}

/// Creates a new `Router` for the cluster endpoints.
pub fn router(state: Simulation) -> Router {
    info!("initializing kafka module");

    let state = KafkaState(state);
    let router = Router::new()
        .route("/{cluster_id}/acls", post(handlers::create_acls))
        .route("/{cluster_id}/acls/delete", delete(handlers::delete_acls))
        .layer(from_fn_with_state(
            state.clone(),
            auth::middleware::<KafkaState>,
        ))
        .with_state(state);

    info!("kafka module initialized successfully");
    router
}
