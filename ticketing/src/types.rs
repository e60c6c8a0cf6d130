//! Offer and purchase shapes.

use chrono::{DateTime, Utc};
use olympia_core::{OfferId, UserId};
use serde::{Deserialize, Serialize};

/// Catalog offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Offer identifier, assigned by the store.
    pub id: OfferId,
    /// Offer display name.
    pub name: String,
    /// Offer description.
    pub description: String,
    /// Price in euros.
    pub price: f64,
    /// Seats covered by one ticket of this offer.
    pub quantity: i32,
    /// Offer category: `solo`, `duo` or `familiale`. Serialized as `type`,
    /// matching the field name clients send when creating an offer.
    #[serde(rename = "type")]
    pub offer_type: String,
    /// When the event takes place.
    pub event_date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Offer creation/update body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOffer {
    /// Offer display name.
    pub name: String,
    /// Offer description.
    pub description: String,
    /// Price in euros.
    pub price: f64,
    /// Seats covered by one ticket of this offer.
    pub quantity: i32,
    /// Offer category: `solo`, `duo` or `familiale`.
    #[serde(rename = "type")]
    pub offer_type: String,
    /// When the event takes place.
    pub event_date: DateTime<Utc>,
}

/// Per-offer sales figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Offer the figures are for.
    pub offer_id: OfferId,
    /// Offer display name.
    pub offer_name: String,
    /// Tickets sold for this offer.
    pub tickets_sold: i64,
    /// Tickets sold times the offer price, in euros.
    pub total_revenue: f64,
    /// When the event takes place.
    pub event_date: DateTime<Utc>,
}

/// Purchase request body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewTicket {
    /// Purchasing identity.
    pub user_id: UserId,
    /// Offer being purchased.
    pub offer_id: OfferId,
}

/// Response body of the QR endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrResponse {
    /// PNG data URI, ready to drop into an `<img src>` attribute.
    pub qr_code: String,
}
