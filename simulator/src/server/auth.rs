use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// A trait for states that require bearer authentication.
///
/// The control plane accepts session tokens while cluster routes accept
/// cluster access tokens, and each replies to failures in its own format.
pub trait RequireAuth: Clone + Send + Sync + 'static {
    /// Returns whether `token` grants access.
    fn is_authorized(&self, token: &str) -> bool;
    /// Returns the response sent when no valid token is presented.
    fn unauthorized(&self) -> Response;
}

/// Axum middleware for authentication.
///
/// This middleware checks for a bearer token in the `Authorization` header.
/// If the token is valid, the request is passed to the next handler.
/// Otherwise, the state's `unauthorized` response is returned.
pub async fn middleware<S>(
    State(state): State<S>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: RequireAuth,
{
    let method = request.method().clone();
    let uri = request.uri().clone();

    debug!(
        method = %method,
        uri = %uri,
        "processing authentication for request"
    );

    let headers = request.headers();
    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(bearer_token) = auth_str.strip_prefix("Bearer ") {
                if state.is_authorized(bearer_token) {
                    debug!(
                        method = %method,
                        uri = %uri,
                        "authentication successful"
                    );
                    return Ok(next.run(request).await);
                } else {
                    warn!(
                        method = %method,
                        uri = %uri,
                        "authentication failed: invalid token"
                    );
                }
            } else {
                warn!(
                    method = %method,
                    uri = %uri,
                    "authentication failed: malformed authorization header"
                );
            }
        } else {
            warn!(
                method = %method,
                uri = %uri,
                "authentication failed: invalid authorization header encoding"
            );
        }
    } else {
        warn!(
            method = %method,
            uri = %uri,
            "authentication failed: no credentials provided"
        );
    }

    Err(state.unauthorized())
}
