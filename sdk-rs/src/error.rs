use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The error body returned by the control plane for every non-2xx response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error: ErrorMessage,
}

/// The `error` object inside an [ErrorPayload].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Errors that can occur when interacting with the Confluent Cloud API.
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the underlying `reqwest` HTTP client.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// An error parsing a URL.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// An error serializing or deserializing JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A non-2xx response carrying the provider's error envelope.
    #[error("{operation}: {message}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        code: i64,
        message: String,
    },
    /// A non-2xx response whose body is not the provider's error envelope.
    #[error("{operation}: {body}")]
    Http {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
    /// A lookup succeeded but did not yield the requested entity.
    #[error("{operation}: {what} not found")]
    NotFound {
        operation: &'static str,
        what: String,
    },
    /// Schema registry creation requires a Kafka cluster in the environment.
    #[error("no cluster found, cannot enable schema registry for environment {0}")]
    NoKafkaCluster(String),
    /// The base URL cannot be used to resolve endpoint paths.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Invalid or missing client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the HTTP status of the failed response, if the error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } | Error::Http { status, .. } => Some(*status),
            Error::Reqwest(err) => err.status(),
            _ => None,
        }
    }

    /// Builds an error from the status and raw body of a failed response.
    ///
    /// The body is decoded as an [ErrorPayload] when possible, otherwise it is
    /// kept verbatim.
    pub(crate) fn from_response(operation: &'static str, status: StatusCode, body: String) -> Self {
        match serde_json::from_str::<ErrorPayload>(&body) {
            Ok(payload) => Error::Api {
                operation,
                status,
                code: payload.error.code,
                message: payload.error.message,
            },
            Err(_) => Error::Http {
                operation,
                status,
                body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_is_decoded() {
        let body = r#"{"error":{"code":401,"message":"invalid credentials"}}"#;
        let err = Error::from_response("login", StatusCode::UNAUTHORIZED, body.to_string());
        match &err {
            Error::Api {
                operation,
                status,
                code,
                message,
            } => {
                assert_eq!(*operation, "login");
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert_eq!(*code, 401);
                assert_eq!(message, "invalid credentials");
            }
            _ => panic!("unexpected error type"),
        }
        assert_eq!(err.to_string(), "login: invalid credentials");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_raw_body_is_kept() {
        let err = Error::from_response(
            "create_acls",
            StatusCode::BAD_REQUEST,
            "bad pattern type".to_string(),
        );
        assert!(matches!(
            &err,
            Error::Http { body, .. } if body == "bad pattern type"
        ));
        assert_eq!(err.to_string(), "create_acls: bad pattern type");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_missing_fields_default() {
        let body = r#"{"error":{"message":"boom"}}"#;
        let err = Error::from_response("me", StatusCode::INTERNAL_SERVER_ERROR, body.to_string());
        assert!(matches!(err, Error::Api { code: 0, .. }));
    }
}
