//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinic_store::ClinicStoreError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request data.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness conflict.
    #[error("{0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credential.
    #[error("Not authorized")]
    AuthenticationRequired,

    /// Bad login. Deliberately identical for unknown email and wrong
    /// password, so callers cannot enumerate accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Insufficient role.
    #[error("{0}")]
    PermissionDenied(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] ClinicStoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, "Not authorized".to_string())
            }
            ServerError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
            }
            ServerError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ServerError::Store(e) => match e {
                ClinicStoreError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                ClinicStoreError::UniqueViolation { .. } => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                ClinicStoreError::Other(_) => {
                    tracing::error!(error = %e, "Store failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
                }
            },
            ServerError::Auth(_) => (StatusCode::UNAUTHORIZED, "Not authorized".to_string()),
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };

        let body = json!({ "message": message });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
