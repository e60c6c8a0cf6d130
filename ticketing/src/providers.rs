//! Ticketing store trait.

use crate::error::Result;
use crate::types::{NewOffer, NewTicket, Offer, SalesSummary};
use chrono::{DateTime, Utc};
use olympia_core::{OfferId, TicketId, TicketRecord, UserId};
use std::future::Future;

/// Outcome of the conditional mark-used transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkUsedOutcome {
    /// This call consumed the ticket.
    Marked,
    /// The ticket was already consumed; nothing changed.
    AlreadyUsed,
    /// No such ticket.
    NotFound,
}

/// Offer and ticket storage.
///
/// Abstracts over the ticketing database (PostgreSQL in production,
/// in-memory for tests). The store is the only place `security_key_2`
/// is ever generated: exactly once, at purchase.
pub trait TicketingStore: Clone + Send + Sync + 'static {
    /// Create an offer.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn create_offer(&self, new: NewOffer) -> impl Future<Output = Result<Offer>> + Send;

    /// Get offer by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Offer not found → `TicketingError::OfferNotFound`
    fn get_offer(&self, id: OfferId) -> impl Future<Output = Result<Offer>> + Send;

    /// List offers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_offers(&self, skip: i64, limit: i64) -> impl Future<Output = Result<Vec<Offer>>> + Send;

    /// Replace an offer's attributes, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Offer not found → `TicketingError::OfferNotFound`
    fn update_offer(&self, id: OfferId, new: NewOffer) -> impl Future<Output = Result<Offer>> + Send;

    /// Delete an offer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Offer not found → `TicketingError::OfferNotFound`
    fn delete_offer(&self, id: OfferId) -> impl Future<Output = Result<()>> + Send;

    /// Sales figures for every offer, oldest offer first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn sales_summary(&self) -> impl Future<Output = Result<Vec<SalesSummary>>> + Send;

    /// Sales figures for one offer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Offer not found → `TicketingError::OfferNotFound`
    fn offer_sales(&self, id: OfferId) -> impl Future<Output = Result<SalesSummary>> + Send;

    /// Record a purchase, issuing the ticket's `security_key_2`.
    ///
    /// The offer must be checked for existence by the caller; the store
    /// only persists.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn create_ticket(&self, new: NewTicket) -> impl Future<Output = Result<TicketRecord>> + Send;

    /// Get ticket by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Ticket not found → `TicketingError::TicketNotFound`
    fn get_ticket(&self, id: TicketId) -> impl Future<Output = Result<TicketRecord>> + Send;

    /// List an identity's tickets, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn tickets_by_user(&self, user_id: UserId) -> impl Future<Output = Result<Vec<TicketRecord>>> + Send;

    /// Atomically flip an unused ticket to used.
    ///
    /// The check and the write are one operation; under concurrent calls
    /// for the same ticket exactly one caller observes
    /// [`MarkUsedOutcome::Marked`].
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn mark_used(&self, id: TicketId, used_at: DateTime<Utc>) -> impl Future<Output = Result<MarkUsedOutcome>> + Send;
}
