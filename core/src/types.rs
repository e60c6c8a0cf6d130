//! Identifier newtypes and the record shapes exchanged between services.
//!
//! Identifiers are `i64` because every store assigns them monotonically
//! and the token wire format carries the ticket id as a plain decimal
//! integer.

use crate::secret::SecurityKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_type! {
    /// Unique identifier for a registered identity.
    UserId
}

id_type! {
    /// Unique identifier for a ticket. Monotonically assigned by the
    /// ticketing store; carried as the first field of the token payload.
    TicketId
}

id_type! {
    /// Unique identifier for a catalog offer.
    OfferId
}

id_type! {
    /// Unique identifier for the staff member performing a scan.
    OperatorId
}

// ═══════════════════════════════════════════════════════════════════════
// Cross-service record shapes
// ═══════════════════════════════════════════════════════════════════════

/// Full ticket record as served by the ticketing service's internal
/// endpoint.
///
/// The ticketing service is the sole writer of `security_key_2`; the
/// validation service is the sole writer of `is_used`/`used_at` (through
/// the conditional mark-used operation). Keeping the two write paths
/// disjoint is what lets the services cooperate without a shared
/// transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Ticket identifier.
    pub id: TicketId,
    /// Owning identity.
    pub user_id: UserId,
    /// Offer the ticket was purchased against.
    pub offer_id: OfferId,
    /// Secret issued at purchase time, generated exactly once.
    pub security_key_2: SecurityKey,
    /// Purchase timestamp.
    pub purchased_at: DateTime<Utc>,
    /// Whether the ticket has been presented and admitted. Once `true`
    /// it never reverts.
    pub is_used: bool,
    /// Set if and only if `is_used` is `true`.
    pub used_at: Option<DateTime<Utc>>,
}

/// Identity record as served by the identity service's internal endpoint.
///
/// Carries `security_key_1`; this shape must never appear on a public
/// route. Public routes serve a profile shape without the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySummary {
    /// Identity identifier.
    pub id: UserId,
    /// Unique identity handle.
    pub email: String,
    /// Given name, used for the holder display name on validation.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Secret issued at registration, generated exactly once.
    pub security_key_1: SecurityKey,
    /// Staff flag — staff operate ticket scanners.
    pub is_staff: bool,
    /// Administrator flag.
    pub is_admin: bool,
}

impl IdentitySummary {
    /// Holder display name as shown on a successful validation.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Offer shape as needed by collaborating services (the validation result
/// reports the offer name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSummary {
    /// Offer identifier.
    pub id: OfferId,
    /// Offer display name.
    pub name: String,
    /// When the event takes place.
    pub event_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn ids_serialize_transparently() {
        let id = TicketId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: TicketId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_name_joins_first_and_last() {
        let identity = IdentitySummary {
            id: UserId(1),
            email: "john.doe@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            security_key_1: SecurityKey::generate(),
            is_staff: false,
            is_admin: false,
        };
        assert_eq!(identity.display_name(), "John Doe");
    }

    #[test]
    fn ticket_record_round_trips() {
        let record = TicketRecord {
            id: TicketId(7),
            user_id: UserId(3),
            offer_id: OfferId(1),
            security_key_2: SecurityKey::generate(),
            purchased_at: Utc::now(),
            is_used: false,
            used_at: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: TicketRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
