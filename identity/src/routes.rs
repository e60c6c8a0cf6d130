//! Router assembly.

use crate::handlers;
use crate::providers::IdentityRepository;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Build the identity service router over any repository implementation.
pub fn build_router<R: IdentityRepository>(repo: R) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/users",
            post(handlers::create_user::<R>).get(handlers::list_users::<R>),
        )
        .route("/users/:id", get(handlers::get_user::<R>))
        .route(
            "/internal/identities/:id",
            get(handlers::internal_identity::<R>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(repo)
}
