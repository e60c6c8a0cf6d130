//! The scan state machine.
//!
//! From the validator's perspective a ticket moves `UNSEEN →
//! VALID_ENTRY → USED`, and `USED` is terminal. The check-then-use
//! step rides on the ticketing service's conditional mark-used
//! statement, so two concurrent scans of the same ticket cannot both
//! succeed: the loser is told the ticket was already used and its
//! audit row says so.

use crate::error::{Result, ValidationError};
use crate::providers::{AuditLog, IdentityDirectory, MarkOutcome, TicketingDirectory};
use crate::types::{NewAuditRecord, ValidationReport};
use chrono::Utc;
use olympia_core::{OperatorId, TicketToken};

/// The validator environment: directory clients plus the audit log.
#[derive(Debug, Clone)]
pub struct Validator<T, I, A> {
    /// Ticketing service client.
    pub tickets: T,
    /// Identity service client.
    pub identities: I,
    /// Append-only audit trail.
    pub audit: A,
}

impl<T, I, A> Validator<T, I, A>
where
    T: TicketingDirectory,
    I: IdentityDirectory,
    A: AuditLog,
{
    /// Run one scan to a definite outcome.
    ///
    /// Malformed payloads and unknown tickets are rejected before any
    /// audit row is written. Every scan that reaches secret
    /// verification writes exactly one row, valid or not.
    ///
    /// # Errors
    ///
    /// Returns the rejection kind for the scan: format, not-found,
    /// signature or already-used; upstream and storage failures
    /// propagate as server errors.
    pub async fn validate(
        &self,
        raw_payload: &str,
        operator_id: OperatorId,
    ) -> Result<ValidationReport> {
        // Step 1: decode. No audit row for garbage input.
        let token: TicketToken = raw_payload.parse()?;

        // Step 2: fetch the authoritative records. Not-found (and
        // lookup timeouts, which the directories fold into not-found)
        // also precedes the audit trail.
        let ticket = self.tickets.ticket(token.ticket_id).await?;
        let holder = self.identities.identity(ticket.user_id).await?;
        let offer = self.tickets.offer(ticket.offer_id).await?;

        let audit = |is_valid: bool| NewAuditRecord {
            ticket_id: ticket.id,
            user_id: ticket.user_id,
            operator_id,
            is_valid,
        };

        // Step 3: verify both secrets. Both comparisons always run and
        // each is constant-time, so neither the response nor its timing
        // reveals which key failed.
        let identity_ok = holder.security_key_1.matches(&token.identity_key);
        let ticket_ok = ticket.security_key_2.matches(&token.ticket_key);
        if !(identity_ok & ticket_ok) {
            self.audit.append(audit(false)).await?;
            tracing::warn!(ticket_id = %ticket.id, %operator_id, "signature mismatch");
            return Err(ValidationError::InvalidSignature);
        }

        // Step 4: replay check on the fetched flag. Runs after the
        // signature check so a replayed payload still had to carry
        // valid secrets to learn it was replayed.
        if ticket.is_used {
            self.audit.append(audit(false)).await?;
            return Err(ValidationError::AlreadyUsed);
        }

        // Step 5: consume. The conditional update is the authoritative
        // replay check; losing the race is reported exactly like a
        // stale flag.
        match self.tickets.mark_used(ticket.id, Utc::now()).await? {
            MarkOutcome::Marked => {}
            MarkOutcome::AlreadyUsed => {
                self.audit.append(audit(false)).await?;
                return Err(ValidationError::AlreadyUsed);
            }
            MarkOutcome::NotFound => {
                // The ticket vanished between fetch and mark. The scan
                // reached verification, so it still leaves a trace.
                self.audit.append(audit(false)).await?;
                return Err(ValidationError::TicketNotFound);
            }
        }

        let record = self.audit.append(audit(true)).await?;
        tracing::info!(ticket_id = %ticket.id, %operator_id, "ticket admitted");

        Ok(ValidationReport {
            valid: true,
            ticket_id: ticket.id,
            holder_name: holder.display_name(),
            offer_name: offer.name,
            purchased_at: ticket.purchased_at,
            validated_at: record.validated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::audit::MemoryAuditLog;
    use crate::directory::{MemoryIdentityDirectory, MemoryTicketingDirectory};
    use olympia_core::{
        IdentitySummary, OfferId, OfferSummary, SecurityKey, TicketId, TicketRecord, UserId,
    };

    type TestValidator = Validator<MemoryTicketingDirectory, MemoryIdentityDirectory, MemoryAuditLog>;

    struct Fixture {
        validator: TestValidator,
        payload: String,
        ticket_id: TicketId,
    }

    fn fixture() -> Fixture {
        let tickets = MemoryTicketingDirectory::new();
        let identities = MemoryIdentityDirectory::new();

        let key1 = SecurityKey::generate();
        let key2 = SecurityKey::generate();

        identities
            .insert(IdentitySummary {
                id: UserId(1),
                email: "alice@example.fr".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Durand".to_string(),
                security_key_1: key1.clone(),
                is_staff: false,
                is_admin: false,
            })
            .unwrap();
        tickets
            .insert_offer(OfferSummary {
                id: OfferId(5),
                name: "Finale Natation".to_string(),
                event_date: Utc::now(),
            })
            .unwrap();
        tickets
            .insert_ticket(TicketRecord {
                id: TicketId(42),
                user_id: UserId(1),
                offer_id: OfferId(5),
                security_key_2: key2.clone(),
                purchased_at: Utc::now(),
                is_used: false,
                used_at: None,
            })
            .unwrap();

        Fixture {
            validator: Validator {
                tickets,
                identities,
                audit: MemoryAuditLog::new(),
            },
            payload: format!("42:{}:{}", key1.as_str(), key2.as_str()),
            ticket_id: TicketId(42),
        }
    }

    async fn audit_rows(validator: &TestValidator) -> Vec<crate::types::AuditRecord> {
        validator.audit.list(0, 100).await.unwrap()
    }

    #[tokio::test]
    async fn first_scan_succeeds_and_reports_holder_and_offer() {
        let f = fixture();
        let report = f.validator.validate(&f.payload, OperatorId(7)).await.unwrap();

        assert!(report.valid);
        assert_eq!(report.ticket_id, f.ticket_id);
        assert_eq!(report.holder_name, "Alice Durand");
        assert_eq!(report.offer_name, "Finale Natation");

        let rows = audit_rows(&f.validator).await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_valid);
        assert_eq!(rows[0].operator_id, OperatorId(7));
    }

    #[tokio::test]
    async fn replaying_the_same_payload_is_already_used() {
        let f = fixture();
        f.validator.validate(&f.payload, OperatorId(7)).await.unwrap();

        let error = f.validator.validate(&f.payload, OperatorId(7)).await.unwrap_err();
        assert!(matches!(error, ValidationError::AlreadyUsed));

        // One valid row from the first scan, one invalid from the replay.
        let rows = audit_rows(&f.validator).await;
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_valid);
        assert!(!rows[1].is_valid);
    }

    #[tokio::test]
    async fn malformed_payloads_leave_no_audit_trace() {
        let f = fixture();
        for bad in ["", "42", "42:onlyonekey", "abc:k1:k2", "1:2:3:4"] {
            let error = f.validator.validate(bad, OperatorId(7)).await.unwrap_err();
            assert!(matches!(error, ValidationError::InvalidFormat(_)), "{bad}");
        }
        assert!(audit_rows(&f.validator).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_ticket_leaves_no_audit_trace() {
        let f = fixture();
        let key = SecurityKey::generate();
        let payload = format!("999:{}:{}", key.as_str(), key.as_str());

        let error = f.validator.validate(&payload, OperatorId(7)).await.unwrap_err();
        assert!(matches!(error, ValidationError::TicketNotFound));
        assert!(audit_rows(&f.validator).await.is_empty());
    }

    #[tokio::test]
    async fn wrong_secret_is_a_signature_error_and_is_audited() {
        let f = fixture();
        let forged = SecurityKey::generate();

        // Replace each key in turn; the rejection must not say which
        // one was wrong.
        let fields: Vec<&str> = f.payload.split(':').collect();
        for forged_payload in [
            format!("42:{}:{}", forged.as_str(), fields[2]),
            format!("42:{}:{}", fields[1], forged.as_str()),
        ] {
            let error = f
                .validator
                .validate(&forged_payload, OperatorId(7))
                .await
                .unwrap_err();
            assert!(matches!(error, ValidationError::InvalidSignature));
        }

        let rows = audit_rows(&f.validator).await;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| !row.is_valid));

        // The ticket was not consumed by the failed attempts.
        let report = f.validator.validate(&f.payload, OperatorId(7)).await.unwrap();
        assert!(report.valid);
    }

    #[tokio::test]
    async fn concurrent_scans_admit_exactly_once() {
        let f = fixture();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let validator = f.validator.clone();
            let payload = f.payload.clone();
            handles.push(tokio::spawn(async move {
                validator.validate(&payload, OperatorId(7)).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(report) => {
                    assert!(report.valid);
                    admitted += 1;
                }
                Err(error) => assert!(matches!(error, ValidationError::AlreadyUsed)),
            }
        }
        assert_eq!(admitted, 1);

        // Every scan reached verification, so every scan left a row,
        // and exactly one row is valid.
        let rows = audit_rows(&f.validator).await;
        assert_eq!(rows.len(), 16);
        assert_eq!(rows.iter().filter(|row| row.is_valid).count(), 1);
    }
}
