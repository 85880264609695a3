//! Error types for the caching service
//!
//! Provides unified error handling using thiserror.
//!
//! The cache layer is a pass-through for backend failures: it only adds
//! state on success and never swallows an upstream error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Service Error Enum ==
/// Unified error type for the caching service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Authorization header absent or not a bearer token
    #[error("Missing or malformed Authorization header")]
    MissingAuth,

    /// Bearer token did not match the configured secret
    #[error("Refresh token rejected")]
    BadToken,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend authentication handshake failed; the client handle is not
    /// memoized and the next call retries construction
    #[error("Backend authentication failed: {0}")]
    BackendAuth(String),

    /// Backend read or write failed (timeout, rate limit, service error)
    #[error("Backend request failed: {0}")]
    BackendFetch(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::BackendFetch(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::MissingAuth => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServiceError::BadToken => (StatusCode::FORBIDDEN, self.to_string()),
            ServiceError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::BackendAuth(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ServiceError::BackendFetch(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching service.
pub type Result<T> = std::result::Result<T, ServiceError>;
