//! Router assembly.

use crate::handlers;
use crate::providers::{AuditLog, IdentityDirectory, TicketingDirectory};
use crate::validator::Validator;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Build the validation service router over any directory and audit
/// implementations.
pub fn build_router<T, I, A>(validator: Validator<T, I, A>) -> Router
where
    T: TicketingDirectory,
    I: IdentityDirectory,
    A: AuditLog,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/validate", post(handlers::validate::<T, I, A>))
        .route("/validations", get(handlers::list_validations::<T, I, A>))
        .route(
            "/validations/operator/:id",
            get(handlers::validations_by_operator::<T, I, A>),
        )
        .route(
            "/validations/ticket/:id",
            get(handlers::validations_by_ticket::<T, I, A>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(validator)
}
