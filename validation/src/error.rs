//! Error types for validation operations.
//!
//! Every rejection kind has a fixed status code and a fixed reason
//! string; kinds are never conflated into a generic `500`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use olympia_core::TokenFormatError;
use serde_json::json;
use thiserror::Error;

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Error taxonomy for the validation service.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The payload did not decode into `"<id>:<key1>:<key2>"`.
    #[error("Invalid QR code format")]
    InvalidFormat(#[from] TokenFormatError),

    /// No ticket with the presented id.
    #[error("Ticket not found")]
    TicketNotFound,

    /// A presented secret did not match the stored one. Which of the
    /// two failed is deliberately not disclosed.
    #[error("Invalid ticket signature")]
    InvalidSignature,

    /// The ticket was consumed by an earlier scan.
    #[error("Ticket has already been used")]
    AlreadyUsed,

    /// A collaborating service could not be reached.
    #[error("{service} service unavailable")]
    Upstream {
        /// Which upstream failed.
        service: &'static str,
        /// Transport-level cause.
        #[source]
        source: reqwest::Error,
    },

    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error (lock poisoning, serialization).
    #[error("Internal error")]
    Internal,
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidFormat(_) | Self::AlreadyUsed => StatusCode::BAD_REQUEST,
            Self::TicketNotFound => StatusCode::NOT_FOUND,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::Upstream { service, source } => {
                tracing::error!(service, error = %source, "upstream unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Database(error) => {
                tracing::error!(%error, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn each_rejection_kind_has_its_own_status() {
        let cases = [
            (
                ValidationError::InvalidFormat(TokenFormatError::WrongFieldCount { found: 2 }),
                StatusCode::BAD_REQUEST,
            ),
            (ValidationError::TicketNotFound, StatusCode::NOT_FOUND),
            (ValidationError::InvalidSignature, StatusCode::UNAUTHORIZED),
            (ValidationError::AlreadyUsed, StatusCode::BAD_REQUEST),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
