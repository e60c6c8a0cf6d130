//! In-memory ticketing store.

use crate::error::{Result, TicketingError};
use crate::providers::{MarkUsedOutcome, TicketingStore};
use crate::types::{NewOffer, NewTicket, Offer, SalesSummary};
use chrono::{DateTime, Utc};
use olympia_core::{OfferId, SecurityKey, TicketId, TicketRecord, UserId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory ticketing store.
///
/// Used for tests and for running the service without a database. The
/// mark-used check-and-set happens under one lock, so concurrent calls
/// for the same ticket serialize and exactly one of them wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryTicketingStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    offers: BTreeMap<i64, Offer>,
    tickets: BTreeMap<i64, TicketRecord>,
    next_offer_id: i64,
    next_ticket_id: i64,
}

impl MemoryTicketingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn summarize(offer: &Offer, tickets: &BTreeMap<i64, TicketRecord>) -> SalesSummary {
    let sold = tickets
        .values()
        .filter(|ticket| ticket.offer_id == offer.id)
        .count();
    let sold = u32::try_from(sold).unwrap_or(u32::MAX);
    SalesSummary {
        offer_id: offer.id,
        offer_name: offer.name.clone(),
        tickets_sold: i64::from(sold),
        total_revenue: f64::from(sold) * offer.price,
        event_date: offer.event_date,
    }
}

impl TicketingStore for MemoryTicketingStore {
    async fn create_offer(&self, new: NewOffer) -> Result<Offer> {
        let mut inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        inner.next_offer_id += 1;
        let offer = Offer {
            id: OfferId(inner.next_offer_id),
            name: new.name,
            description: new.description,
            price: new.price,
            quantity: new.quantity,
            offer_type: new.offer_type,
            event_date: new.event_date,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.offers.insert(offer.id.0, offer.clone());
        Ok(offer)
    }

    async fn get_offer(&self, id: OfferId) -> Result<Offer> {
        self.inner
            .lock()
            .map_err(|_| TicketingError::Internal)?
            .offers
            .get(&id.0)
            .cloned()
            .ok_or(TicketingError::OfferNotFound)
    }

    async fn list_offers(&self, skip: i64, limit: i64) -> Result<Vec<Offer>> {
        let inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        Ok(inner
            .offers
            .values()
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn update_offer(&self, id: OfferId, new: NewOffer) -> Result<Offer> {
        let mut inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        let offer = inner
            .offers
            .get_mut(&id.0)
            .ok_or(TicketingError::OfferNotFound)?;
        offer.name = new.name;
        offer.description = new.description;
        offer.price = new.price;
        offer.quantity = new.quantity;
        offer.offer_type = new.offer_type;
        offer.event_date = new.event_date;
        offer.updated_at = Some(Utc::now());
        Ok(offer.clone())
    }

    async fn delete_offer(&self, id: OfferId) -> Result<()> {
        self.inner
            .lock()
            .map_err(|_| TicketingError::Internal)?
            .offers
            .remove(&id.0)
            .map(|_| ())
            .ok_or(TicketingError::OfferNotFound)
    }

    async fn sales_summary(&self) -> Result<Vec<SalesSummary>> {
        let inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        Ok(inner
            .offers
            .values()
            .map(|offer| summarize(offer, &inner.tickets))
            .collect())
    }

    async fn offer_sales(&self, id: OfferId) -> Result<SalesSummary> {
        let inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        let offer = inner.offers.get(&id.0).ok_or(TicketingError::OfferNotFound)?;
        Ok(summarize(offer, &inner.tickets))
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<TicketRecord> {
        let mut inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        inner.next_ticket_id += 1;
        let ticket = TicketRecord {
            id: TicketId(inner.next_ticket_id),
            user_id: new.user_id,
            offer_id: new.offer_id,
            security_key_2: SecurityKey::generate(),
            purchased_at: Utc::now(),
            is_used: false,
            used_at: None,
        };
        inner.tickets.insert(ticket.id.0, ticket.clone());
        Ok(ticket)
    }

    async fn get_ticket(&self, id: TicketId) -> Result<TicketRecord> {
        self.inner
            .lock()
            .map_err(|_| TicketingError::Internal)?
            .tickets
            .get(&id.0)
            .cloned()
            .ok_or(TicketingError::TicketNotFound)
    }

    async fn tickets_by_user(&self, user_id: UserId) -> Result<Vec<TicketRecord>> {
        let inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        Ok(inner
            .tickets
            .values()
            .filter(|ticket| ticket.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_used(&self, id: TicketId, used_at: DateTime<Utc>) -> Result<MarkUsedOutcome> {
        let mut inner = self.inner.lock().map_err(|_| TicketingError::Internal)?;
        let Some(ticket) = inner.tickets.get_mut(&id.0) else {
            return Ok(MarkUsedOutcome::NotFound);
        };
        if ticket.is_used {
            return Ok(MarkUsedOutcome::AlreadyUsed);
        }
        ticket.is_used = true;
        ticket.used_at = Some(used_at);
        Ok(MarkUsedOutcome::Marked)
    }
}
