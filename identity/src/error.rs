//! Error types for identity operations.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Error taxonomy for the identity service.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// An identity with this email already exists.
    #[error("Email already registered")]
    EmailTaken,

    /// No identity with the requested id.
    #[error("User not found")]
    IdentityNotFound,

    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error (lock poisoning, serialization).
    #[error("Internal error")]
    Internal,
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::EmailTaken => StatusCode::BAD_REQUEST,
            Self::IdentityNotFound => StatusCode::NOT_FOUND,
            Self::Database(error) => {
                tracing::error!(%error, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
