//! Error types for ticketing operations.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for ticketing operations.
pub type Result<T> = std::result::Result<T, TicketingError>;

/// Error taxonomy for the ticketing service.
#[derive(Debug, Error)]
pub enum TicketingError {
    /// No offer with the requested id.
    #[error("Offer not found")]
    OfferNotFound,

    /// No ticket with the requested id.
    #[error("Ticket not found")]
    TicketNotFound,

    /// The ticket holder does not exist in the identity service.
    #[error("User not found")]
    IdentityNotFound,

    /// Mark-used hit a ticket that was already consumed.
    #[error("Ticket already used")]
    AlreadyUsed,

    /// The identity service could not be reached.
    #[error("Identity service unavailable")]
    IdentityUnavailable(#[source] reqwest::Error),

    /// QR rendering failed.
    #[error("QR encoding failed")]
    Qr(#[from] olympia_core::QrError),

    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error (lock poisoning, serialization).
    #[error("Internal error")]
    Internal,
}

impl IntoResponse for TicketingError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::OfferNotFound | Self::TicketNotFound | Self::IdentityNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::AlreadyUsed => StatusCode::CONFLICT,
            Self::IdentityUnavailable(error) => {
                tracing::error!(%error, "identity service unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Qr(error) => {
                tracing::error!(%error, "qr rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR
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
