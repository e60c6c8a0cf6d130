//! In-memory audit log.

use crate::error::{Result, ValidationError};
use crate::providers::AuditLog;
use crate::types::{AuditRecord, NewAuditRecord};
use chrono::Utc;
use olympia_core::{OperatorId, TicketId};
use std::sync::{Arc, Mutex};

/// In-memory audit log.
///
/// Rows are only ever appended; the backing `Vec` order is insertion
/// order, which is also `validated_at` order.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for MemoryAuditLog {
    async fn append(&self, new: NewAuditRecord) -> Result<AuditRecord> {
        let mut records = self.records.lock().map_err(|_| ValidationError::Internal)?;
        let record = AuditRecord {
            id: i64::try_from(records.len()).map_err(|_| ValidationError::Internal)? + 1,
            ticket_id: new.ticket_id,
            user_id: new.user_id,
            operator_id: new.operator_id,
            validated_at: Utc::now(),
            is_valid: new.is_valid,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<AuditRecord>> {
        let records = self.records.lock().map_err(|_| ValidationError::Internal)?;
        Ok(records
            .iter()
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn by_operator(&self, operator_id: OperatorId) -> Result<Vec<AuditRecord>> {
        let records = self.records.lock().map_err(|_| ValidationError::Internal)?;
        Ok(records
            .iter()
            .filter(|record| record.operator_id == operator_id)
            .cloned()
            .collect())
    }

    async fn by_ticket(&self, ticket_id: TicketId) -> Result<Vec<AuditRecord>> {
        let records = self.records.lock().map_err(|_| ValidationError::Internal)?;
        Ok(records
            .iter()
            .filter(|record| record.ticket_id == ticket_id)
            .cloned()
            .collect())
    }
}
