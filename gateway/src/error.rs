//! Gateway error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors produced while forwarding a request to a backend service.
///
/// Rate-limit rejections never reach this type — the admission middleware
/// answers them before the proxy runs.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend service could not be reached.
    #[error("service {service} unavailable")]
    Unavailable {
        /// Logical name of the unreachable service.
        service: &'static str,
        /// Transport-level cause, logged but not exposed.
        #[source]
        source: reqwest::Error,
    },

    /// The request used a method the gateway does not forward.
    #[error("method {0} not allowed")]
    MethodNotAllowed(http::Method),

    /// The request body could not be buffered for forwarding.
    #[error("unreadable request body")]
    UnreadableBody,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Unavailable { service, source } => {
                tracing::error!(service, error = %source, "upstream unreachable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("Service {service} unavailable"),
                )
            }
            Self::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method {method} not allowed"),
            ),
            Self::UnreadableBody => (
                StatusCode::BAD_REQUEST,
                "Unreadable request body".to_string(),
            ),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
