//! Router configuration for the gateway.

use crate::middleware::{admission_layer, AdmissionControl};
use crate::proxy::{auth_route, tickets_route, validation_route, GatewayState};
use crate::security::security_headers;
use axum::{
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the gateway router.
///
/// Layer order (outermost first): tracing, security headers, admission
/// control. Admission therefore stamps rate-limit metadata on every
/// proxied response, and its own `429` rejections still receive the
/// security headers.
pub fn build_router(state: GatewayState, control: Arc<AdmissionControl>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth", any(auth_route))
        .route("/auth/*path", any(auth_route))
        .route("/tickets", any(tickets_route))
        .route("/tickets/*path", any(tickets_route))
        .route("/validation", any(validation_route))
        .route("/validation/*path", any(validation_route))
        .layer(admission_layer(control))
        .layer(axum::middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Gateway health check, reporting the configured upstreams.
async fn health(
    axum::extract::State(state): axum::extract::State<GatewayState>,
) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "services": {
            "auth": state.upstreams.auth,
            "tickets": state.upstreams.tickets,
            "validation": state.upstreams.validation,
        }
    }))
}
