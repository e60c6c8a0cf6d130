//! Router assembly.

use crate::directory::IdentityDirectory;
use crate::handlers::{self, TicketingState};
use crate::providers::TicketingStore;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Build the ticketing service router over any store and directory
/// implementation.
pub fn build_router<S: TicketingStore, I: IdentityDirectory>(
    state: TicketingState<S, I>,
) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/offers",
            get(handlers::list_offers::<S, I>).post(handlers::create_offer::<S, I>),
        )
        .route(
            "/offers/:id",
            get(handlers::get_offer::<S, I>)
                .put(handlers::update_offer::<S, I>)
                .delete(handlers::delete_offer::<S, I>),
        )
        .route("/sales", get(handlers::sales_summary::<S, I>))
        .route("/sales/:id", get(handlers::offer_sales::<S, I>))
        .route("/tickets", post(handlers::create_ticket::<S, I>))
        .route("/tickets/user/:id", get(handlers::tickets_by_user::<S, I>))
        .route("/tickets/:id", get(handlers::get_ticket::<S, I>))
        .route("/tickets/:id/qrcode", get(handlers::ticket_qrcode::<S, I>))
        .route("/internal/tickets/:id", get(handlers::internal_ticket::<S, I>))
        .route(
            "/internal/tickets/:id/use",
            post(handlers::internal_mark_used::<S, I>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
