//! In-memory directory doubles for tests.

use crate::error::{Result, ValidationError};
use crate::providers::{IdentityDirectory, MarkOutcome, TicketingDirectory};
use chrono::{DateTime, Utc};
use olympia_core::{IdentitySummary, OfferId, OfferSummary, TicketId, TicketRecord, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory ticketing directory.
///
/// Behaves like the real service: `mark_used` is a check-and-set under
/// one lock, so concurrent calls for the same ticket have exactly one
/// winner.
#[derive(Debug, Clone, Default)]
pub struct MemoryTicketingDirectory {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    tickets: HashMap<TicketId, TicketRecord>,
    offers: HashMap<OfferId, OfferSummary>,
}

impl MemoryTicketingDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a ticket record.
    ///
    /// # Errors
    ///
    /// Returns error if the directory lock is poisoned.
    pub fn insert_ticket(&self, ticket: TicketRecord) -> Result<()> {
        self.inner
            .lock()
            .map_err(|_| ValidationError::Internal)?
            .tickets
            .insert(ticket.id, ticket);
        Ok(())
    }

    /// Insert or replace an offer record.
    ///
    /// # Errors
    ///
    /// Returns error if the directory lock is poisoned.
    pub fn insert_offer(&self, offer: OfferSummary) -> Result<()> {
        self.inner
            .lock()
            .map_err(|_| ValidationError::Internal)?
            .offers
            .insert(offer.id, offer);
        Ok(())
    }
}

impl TicketingDirectory for MemoryTicketingDirectory {
    async fn ticket(&self, id: TicketId) -> Result<TicketRecord> {
        self.inner
            .lock()
            .map_err(|_| ValidationError::Internal)?
            .tickets
            .get(&id)
            .cloned()
            .ok_or(ValidationError::TicketNotFound)
    }

    async fn offer(&self, id: OfferId) -> Result<OfferSummary> {
        self.inner
            .lock()
            .map_err(|_| ValidationError::Internal)?
            .offers
            .get(&id)
            .cloned()
            .ok_or(ValidationError::TicketNotFound)
    }

    async fn mark_used(&self, id: TicketId, used_at: DateTime<Utc>) -> Result<MarkOutcome> {
        let mut inner = self.inner.lock().map_err(|_| ValidationError::Internal)?;
        let Some(ticket) = inner.tickets.get_mut(&id) else {
            return Ok(MarkOutcome::NotFound);
        };
        if ticket.is_used {
            return Ok(MarkOutcome::AlreadyUsed);
        }
        ticket.is_used = true;
        ticket.used_at = Some(used_at);
        Ok(MarkOutcome::Marked)
    }
}

/// In-memory identity directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityDirectory {
    identities: Arc<Mutex<HashMap<UserId, IdentitySummary>>>,
}

impl MemoryIdentityDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an identity record.
    ///
    /// # Errors
    ///
    /// Returns error if the directory lock is poisoned.
    pub fn insert(&self, identity: IdentitySummary) -> Result<()> {
        self.identities
            .lock()
            .map_err(|_| ValidationError::Internal)?
            .insert(identity.id, identity);
        Ok(())
    }
}

impl IdentityDirectory for MemoryIdentityDirectory {
    async fn identity(&self, id: UserId) -> Result<IdentitySummary> {
        self.identities
            .lock()
            .map_err(|_| ValidationError::Internal)?
            .get(&id)
            .cloned()
            .ok_or(ValidationError::TicketNotFound)
    }
}
