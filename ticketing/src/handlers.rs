//! HTTP handlers for the ticketing service.

use crate::directory::IdentityDirectory;
use crate::error::{Result, TicketingError};
use crate::providers::{MarkUsedOutcome, TicketingStore};
use crate::types::{NewOffer, NewTicket, Offer, QrResponse, SalesSummary};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use olympia_core::{OfferId, TicketId, TicketRecord, TicketToken, UserId, qr};
use serde::Deserialize;
use serde_json::{Value, json};

/// Shared state: the store plus the identity directory client.
#[derive(Debug, Clone)]
pub struct TicketingState<S, I> {
    /// Offer and ticket storage.
    pub store: S,
    /// Identity directory for `security_key_1` lookups.
    pub identities: I,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct Page {
    /// Rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows to return.
    #[serde(default = "Page::default_limit")]
    pub limit: i64,
}

impl Page {
    const fn default_limit() -> i64 {
        100
    }
}

/// Mark-used request body, sent by the validation service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UseTicket {
    /// Scan timestamp, taken from the validator's clock.
    pub used_at: DateTime<Utc>,
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "tickets" }))
}

/// `GET /offers`
///
/// # Errors
///
/// Returns `500` if the store query fails.
pub async fn list_offers<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<Offer>>> {
    Ok(Json(state.store.list_offers(page.skip, page.limit).await?))
}

/// `GET /offers/{id}`
///
/// # Errors
///
/// Returns `404` if the offer does not exist.
pub async fn get_offer<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
) -> Result<Json<Offer>> {
    Ok(Json(state.store.get_offer(OfferId(id)).await?))
}

/// `POST /offers`
///
/// # Errors
///
/// Returns `500` if the store query fails.
pub async fn create_offer<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Json(new): Json<NewOffer>,
) -> Result<(StatusCode, Json<Offer>)> {
    let offer = state.store.create_offer(new).await?;
    tracing::info!(offer_id = %offer.id, "offer created");
    Ok((StatusCode::CREATED, Json(offer)))
}

/// `PUT /offers/{id}`
///
/// # Errors
///
/// Returns `404` if the offer does not exist.
pub async fn update_offer<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
    Json(new): Json<NewOffer>,
) -> Result<Json<Offer>> {
    Ok(Json(state.store.update_offer(OfferId(id), new).await?))
}

/// `DELETE /offers/{id}`
///
/// # Errors
///
/// Returns `404` if the offer does not exist.
pub async fn delete_offer<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.store.delete_offer(OfferId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /sales` — per-offer ticket counts and revenue.
///
/// # Errors
///
/// Returns `500` if the store query fails.
pub async fn sales_summary<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
) -> Result<Json<Vec<SalesSummary>>> {
    Ok(Json(state.store.sales_summary().await?))
}

/// `GET /sales/{offer_id}`
///
/// # Errors
///
/// Returns `404` if the offer does not exist.
pub async fn offer_sales<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
) -> Result<Json<SalesSummary>> {
    Ok(Json(state.store.offer_sales(OfferId(id)).await?))
}

/// `POST /tickets` — record a purchase and issue `security_key_2`.
///
/// # Errors
///
/// Returns `404` if the offer does not exist.
pub async fn create_ticket<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Json(new): Json<NewTicket>,
) -> Result<(StatusCode, Json<TicketRecord>)> {
    // The offer check and the insert are separate statements; offers
    // are never deleted while on sale, so the gap is acceptable.
    state.store.get_offer(new.offer_id).await?;
    let ticket = state.store.create_ticket(new).await?;
    tracing::info!(ticket_id = %ticket.id, user_id = %ticket.user_id, "ticket purchased");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// `GET /tickets/user/{id}`
///
/// # Errors
///
/// Returns `500` if the store query fails.
pub async fn tickets_by_user<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<TicketRecord>>> {
    Ok(Json(state.store.tickets_by_user(UserId(user_id)).await?))
}

/// `GET /tickets/{id}`
///
/// # Errors
///
/// Returns `404` if the ticket does not exist.
pub async fn get_ticket<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
) -> Result<Json<TicketRecord>> {
    Ok(Json(state.store.get_ticket(TicketId(id)).await?))
}

/// `GET /tickets/{id}/qrcode` — bind both secrets into the scannable
/// credential.
///
/// Fetches the holder's `security_key_1` from the identity service,
/// joins it with the ticket's own `security_key_2` and renders the
/// payload as a QR PNG data URI.
///
/// # Errors
///
/// Returns `404` if the ticket or its holder does not exist, `503` if
/// the identity service is unreachable.
pub async fn ticket_qrcode<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
) -> Result<Json<QrResponse>> {
    let ticket = state.store.get_ticket(TicketId(id)).await?;
    let holder = state.identities.identity(ticket.user_id).await?;

    let token = TicketToken::new(ticket.id, holder.security_key_1, ticket.security_key_2);
    let qr_code = qr::render_png_data_uri(&token.encode())?;

    Ok(Json(QrResponse { qr_code }))
}

/// `GET /internal/tickets/{id}` — full record including
/// `security_key_2`, for the validation service.
///
/// # Errors
///
/// Returns `404` if the ticket does not exist.
pub async fn internal_ticket<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
) -> Result<Json<TicketRecord>> {
    Ok(Json(state.store.get_ticket(TicketId(id)).await?))
}

/// `POST /internal/tickets/{id}/use` — the atomic single-use transition.
///
/// # Errors
///
/// Returns `409` if the ticket was already consumed, `404` if it does
/// not exist.
pub async fn internal_mark_used<S: TicketingStore, I: IdentityDirectory>(
    State(state): State<TicketingState<S, I>>,
    Path(id): Path<i64>,
    Json(body): Json<UseTicket>,
) -> Result<Json<Value>> {
    match state.store.mark_used(TicketId(id), body.used_at).await? {
        MarkUsedOutcome::Marked => {
            tracing::info!(ticket_id = id, "ticket consumed");
            Ok(Json(json!({ "status": "marked" })))
        }
        MarkUsedOutcome::AlreadyUsed => Err(TicketingError::AlreadyUsed),
        MarkUsedOutcome::NotFound => Err(TicketingError::TicketNotFound),
    }
}
