use axum::{serve, Router};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod auth;
pub mod control;
pub mod kafka;
pub mod state;

pub use state::Simulation;

/// Subcommand for the server.
pub const CMD: &str = "server";

/// Run the simulator server.
pub const RUN_CMD: &str = "run";

/// The prefix under which the control-plane API is served.
pub const API_PREFIX: &str = "/api";

/// The prefix under which the per-cluster Kafka API is served.
pub const KAFKA_PREFIX: &str = "/2.0/kafka";

/// The maximum size of any request body in bytes (1MB).
const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// Errors that can occur when running the simulator server.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the router serving both the control plane and the cluster API.
pub fn router(state: Simulation) -> Router {
    // Create a permissive CORS layer.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .nest(API_PREFIX, control::router(state.clone()))
        .nest(KAFKA_PREFIX, kafka::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_SIZE))
}

/// Runs the Confluent Cloud simulator server.
///
/// # Arguments
///
/// * `port` - The port to bind the server to.
/// * `email` - The account email accepted by `sessions`.
/// * `password` - The account password accepted by `sessions`.
/// * `api_endpoint` - The address advertised as the `api_endpoint` of created clusters.
///   Defaults to `http://127.0.0.1:{port}`.
pub async fn run(
    port: &u16,
    email: String,
    password: String,
    api_endpoint: Option<String>,
) -> Result<(), Error> {
    let api_endpoint = api_endpoint.unwrap_or_else(|| format!("http://127.0.0.1:{port}"));
    info!(
        port = port,
        email = %email,
        api_endpoint = %api_endpoint,
        "starting confluent cloud simulator server"
    );

    // Create a listener for the server on the specified port.
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(address = %listener.local_addr()?, "server listening");

    let state = Simulation::new(Arc::new(email), Arc::new(password), Arc::new(api_endpoint));
    let router = router(state);

    info!("server routes configured, starting to serve requests");

    // Serve the server.
    serve(listener, router.into_make_service())
        .await
        .map_err(Error::Io)
}
