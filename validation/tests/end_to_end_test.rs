//! Full-platform flow: register, purchase, encode, validate, replay.
//!
//! Instead of seeded doubles this suite wires the validator's directory
//! traits straight onto the identity and ticketing crates' in-memory
//! stores, so a scan consumes the very record the purchase created and
//! the single-use guarantee is exercised through the real conditional
//! transition.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use chrono::{DateTime, Utc};
use olympia_core::{
    IdentitySummary, OfferId, OfferSummary, OperatorId, TicketId, TicketRecord, TicketToken, qr,
};
use olympia_identity::{IdentityRepository, MemoryIdentityStore, NewIdentity};
use olympia_ticketing::{MarkUsedOutcome, MemoryTicketingStore, NewOffer, NewTicket, TicketingStore};
use olympia_validation::{
    AuditLog, IdentityDirectory, MarkOutcome, MemoryAuditLog, TicketingDirectory, ValidationError,
    Validator,
};

/// Adapts the ticketing store to the validator's directory seam, the
/// way the HTTP client does against the live service.
#[derive(Clone)]
struct TicketBridge(MemoryTicketingStore);

impl TicketingDirectory for TicketBridge {
    async fn ticket(&self, id: TicketId) -> olympia_validation::Result<TicketRecord> {
        self.0
            .get_ticket(id)
            .await
            .map_err(|_| ValidationError::TicketNotFound)
    }

    async fn offer(&self, id: OfferId) -> olympia_validation::Result<OfferSummary> {
        self.0
            .get_offer(id)
            .await
            .map(|offer| OfferSummary {
                id: offer.id,
                name: offer.name,
                event_date: offer.event_date,
            })
            .map_err(|_| ValidationError::TicketNotFound)
    }

    async fn mark_used(
        &self,
        id: TicketId,
        used_at: DateTime<Utc>,
    ) -> olympia_validation::Result<MarkOutcome> {
        match self
            .0
            .mark_used(id, used_at)
            .await
            .map_err(|_| ValidationError::TicketNotFound)?
        {
            MarkUsedOutcome::Marked => Ok(MarkOutcome::Marked),
            MarkUsedOutcome::AlreadyUsed => Ok(MarkOutcome::AlreadyUsed),
            MarkUsedOutcome::NotFound => Ok(MarkOutcome::NotFound),
        }
    }
}

#[derive(Clone)]
struct IdentityBridge(MemoryIdentityStore);

impl IdentityDirectory for IdentityBridge {
    async fn identity(
        &self,
        id: olympia_core::UserId,
    ) -> olympia_validation::Result<IdentitySummary> {
        self.0
            .get(id)
            .await
            .map(|identity| identity.summary())
            .map_err(|_| ValidationError::TicketNotFound)
    }
}

struct Platform {
    identities: MemoryIdentityStore,
    tickets: MemoryTicketingStore,
    validator: Validator<TicketBridge, IdentityBridge, MemoryAuditLog>,
}

fn platform() -> Platform {
    let identities = MemoryIdentityStore::new();
    let tickets = MemoryTicketingStore::new();
    let validator = Validator {
        tickets: TicketBridge(tickets.clone()),
        identities: IdentityBridge(identities.clone()),
        audit: MemoryAuditLog::new(),
    };
    Platform {
        identities,
        tickets,
        validator,
    }
}

/// Register a holder, create an offer, purchase a ticket and return the
/// scannable payload built from the stored secrets.
async fn sell_one_ticket(p: &Platform) -> (TicketRecord, String) {
    let holder = p
        .identities
        .create(NewIdentity {
            email: "leon.marchand@example.fr".to_string(),
            first_name: "Leon".to_string(),
            last_name: "Marchand".to_string(),
            is_staff: false,
            is_admin: false,
        })
        .await
        .unwrap();

    let offer = p
        .tickets
        .create_offer(NewOffer {
            name: "Natation - Finale 400m".to_string(),
            description: "Une place".to_string(),
            price: 180.0,
            quantity: 1,
            offer_type: "solo".to_string(),
            event_date: Utc::now(),
        })
        .await
        .unwrap();

    let ticket = p
        .tickets
        .create_ticket(NewTicket {
            user_id: holder.id,
            offer_id: offer.id,
        })
        .await
        .unwrap();

    let payload = TicketToken::new(
        ticket.id,
        holder.security_key_1.clone(),
        ticket.security_key_2.clone(),
    )
    .encode();

    (ticket, payload)
}

#[tokio::test]
async fn sold_ticket_scans_once_and_replay_is_rejected() {
    let p = platform();
    let (ticket, payload) = sell_one_ticket(&p).await;

    // The payload renders to an embeddable QR image.
    let uri = qr::render_png_data_uri(&payload).unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));

    let report = p.validator.validate(&payload, OperatorId(1)).await.unwrap();
    assert!(report.valid);
    assert_eq!(report.ticket_id, ticket.id);
    assert_eq!(report.holder_name, "Leon Marchand");
    assert_eq!(report.offer_name, "Natation - Finale 400m");
    assert_eq!(report.purchased_at, ticket.purchased_at);

    // The scan consumed the authoritative record, not a copy.
    let stored = p.tickets.get_ticket(ticket.id).await.unwrap();
    assert!(stored.is_used);
    assert!(stored.used_at.is_some());

    let replay = p.validator.validate(&payload, OperatorId(2)).await;
    assert!(matches!(replay, Err(ValidationError::AlreadyUsed)));
}

#[tokio::test]
async fn concurrent_scans_of_one_sold_ticket_admit_exactly_once() {
    let p = platform();
    let (_, payload) = sell_one_ticket(&p).await;

    let mut handles = Vec::new();
    for operator in 0..12 {
        let validator = p.validator.clone();
        let payload = payload.clone();
        handles.push(tokio::spawn(async move {
            validator.validate(&payload, OperatorId(operator)).await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(error) => assert!(matches!(error, ValidationError::AlreadyUsed)),
        }
    }
    assert_eq!(admitted, 1);

    let rows = p.validator.audit.list(0, 100).await.unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows.iter().filter(|row| row.is_valid).count(), 1);
}

#[tokio::test]
async fn a_second_holders_keys_do_not_open_anothers_ticket() {
    let p = platform();
    let (ticket, _) = sell_one_ticket(&p).await;

    let other = p
        .identities
        .create(NewIdentity {
            email: "intruder@example.fr".to_string(),
            first_name: "I".to_string(),
            last_name: "N".to_string(),
            is_staff: false,
            is_admin: false,
        })
        .await
        .unwrap();

    // Presenting the wrong holder's identity key against a real ticket id.
    let forged = TicketToken::new(
        ticket.id,
        other.security_key_1,
        ticket.security_key_2.clone(),
    )
    .encode();

    let error = p.validator.validate(&forged, OperatorId(1)).await.unwrap_err();
    assert!(matches!(error, ValidationError::InvalidSignature));

    // The real ticket is still scannable.
    assert!(!p.tickets.get_ticket(ticket.id).await.unwrap().is_used);
}
