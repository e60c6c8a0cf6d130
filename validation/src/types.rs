//! Validation request, report and audit shapes.

use chrono::{DateTime, Utc};
use olympia_core::{OperatorId, TicketId, UserId};
use serde::{Deserialize, Serialize};

/// Scan request body, produced by a staff scanner.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationRequest {
    /// Raw decoded QR payload: `"<ticketId>:<key1>:<key2>"`.
    pub payload: String,
    /// Staff member performing the scan.
    pub operator_id: OperatorId,
}

/// Successful validation report, shown to the operator at the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Always `true`; failures are error responses, not reports.
    pub valid: bool,
    /// The admitted ticket.
    pub ticket_id: TicketId,
    /// Holder display name.
    pub holder_name: String,
    /// Offer display name.
    pub offer_name: String,
    /// Original purchase time.
    pub purchased_at: DateTime<Utc>,
    /// When this scan consumed the ticket.
    pub validated_at: DateTime<Utc>,
}

/// One row of the append-only audit trail.
///
/// Written for every scan that reached secret verification, valid or
/// not. Rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Record identifier, assigned by the log.
    pub id: i64,
    /// Scanned ticket.
    pub ticket_id: TicketId,
    /// Ticket holder at the time of the scan.
    pub user_id: UserId,
    /// Staff member who performed the scan.
    pub operator_id: OperatorId,
    /// When the scan happened.
    pub validated_at: DateTime<Utc>,
    /// Whether the scan admitted the holder.
    pub is_valid: bool,
}

/// Audit row to append; the log assigns `id` and `validated_at`.
#[derive(Debug, Clone, Copy)]
pub struct NewAuditRecord {
    /// Scanned ticket.
    pub ticket_id: TicketId,
    /// Ticket holder at the time of the scan.
    pub user_id: UserId,
    /// Staff member who performed the scan.
    pub operator_id: OperatorId,
    /// Whether the scan admitted the holder.
    pub is_valid: bool,
}
