//! Provider traits: the validator's seams toward the rest of the
//! platform.
//!
//! There is no shared transaction across services. The ticketing
//! service is the sole writer of secret fields; through `mark_used`
//! the validator is the sole writer of `is_used`/`used_at`. Keeping
//! the write paths disjoint is what makes the synchronous
//! call-and-response interface below sufficient.

use crate::error::Result;
use crate::types::{AuditRecord, NewAuditRecord};
use chrono::{DateTime, Utc};
use olympia_core::{IdentitySummary, OfferId, OfferSummary, OperatorId, TicketId, TicketRecord, UserId};
use std::future::Future;

/// Outcome of asking the ticketing service to consume a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// This scan consumed the ticket.
    Marked,
    /// An earlier scan got there first.
    AlreadyUsed,
    /// The ticket vanished between fetch and mark.
    NotFound,
}

/// Read and consume access to the ticketing service.
///
/// Lookup timeouts are reported as not-found — never as success —
/// so a slow upstream can only deny a scan, not admit one.
pub trait TicketingDirectory: Clone + Send + Sync + 'static {
    /// Fetch the authoritative ticket record.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ticket not found (or lookup timed out) → `ValidationError::TicketNotFound`
    /// - Ticketing service unreachable → `ValidationError::Upstream`
    fn ticket(&self, id: TicketId) -> impl Future<Output = Result<TicketRecord>> + Send;

    /// Fetch the offer a ticket was purchased against.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Offer not found (or lookup timed out) → `ValidationError::TicketNotFound`
    /// - Ticketing service unreachable → `ValidationError::Upstream`
    fn offer(&self, id: OfferId) -> impl Future<Output = Result<OfferSummary>> + Send;

    /// Atomically consume a ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the ticketing service is unreachable.
    fn mark_used(&self, id: TicketId, used_at: DateTime<Utc>) -> impl Future<Output = Result<MarkOutcome>> + Send;
}

/// Read access to identity records, including `security_key_1`.
pub trait IdentityDirectory: Clone + Send + Sync + 'static {
    /// Fetch the full identity record of a ticket holder.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Identity not found (or lookup timed out) → `ValidationError::TicketNotFound`
    /// - Identity service unreachable → `ValidationError::Upstream`
    fn identity(&self, id: UserId) -> impl Future<Output = Result<IdentitySummary>> + Send;
}

/// Append-only audit trail.
///
/// One row per scan that reached secret verification. Rows are never
/// updated or deleted.
pub trait AuditLog: Clone + Send + Sync + 'static {
    /// Append a row, stamping `id` and `validated_at`.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn append(&self, new: NewAuditRecord) -> impl Future<Output = Result<AuditRecord>> + Send;

    /// List rows, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list(&self, skip: i64, limit: i64) -> impl Future<Output = Result<Vec<AuditRecord>>> + Send;

    /// List rows written for scans by one operator.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn by_operator(&self, operator_id: OperatorId) -> impl Future<Output = Result<Vec<AuditRecord>>> + Send;

    /// List rows written for one ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn by_ticket(&self, ticket_id: TicketId) -> impl Future<Output = Result<Vec<AuditRecord>>> + Send;
}
