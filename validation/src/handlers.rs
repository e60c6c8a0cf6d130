//! HTTP handlers for the validation service.

use crate::error::Result;
use crate::providers::{AuditLog, IdentityDirectory, TicketingDirectory};
use crate::types::{AuditRecord, ValidationReport, ValidationRequest};
use crate::validator::Validator;
use axum::Json;
use axum::extract::{Path, Query, State};
use olympia_core::{OperatorId, TicketId};
use serde::Deserialize;
use serde_json::{Value, json};

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct Page {
    /// Rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows to return.
    #[serde(default = "Page::default_limit")]
    pub limit: i64,
}

impl Page {
    const fn default_limit() -> i64 {
        100
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "validation" }))
}

/// `POST /validate` — run one scan to a definite outcome.
///
/// # Errors
///
/// Returns `400` for malformed or already-used payloads, `401` for
/// secret mismatches, `404` for unknown tickets.
pub async fn validate<T, I, A>(
    State(validator): State<Validator<T, I, A>>,
    Json(request): Json<ValidationRequest>,
) -> Result<Json<ValidationReport>>
where
    T: TicketingDirectory,
    I: IdentityDirectory,
    A: AuditLog,
{
    let report = validator
        .validate(&request.payload, request.operator_id)
        .await?;
    Ok(Json(report))
}

/// `GET /validations`
///
/// # Errors
///
/// Returns `500` if the audit query fails.
pub async fn list_validations<T, I, A>(
    State(validator): State<Validator<T, I, A>>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<AuditRecord>>>
where
    T: TicketingDirectory,
    I: IdentityDirectory,
    A: AuditLog,
{
    Ok(Json(validator.audit.list(page.skip, page.limit).await?))
}

/// `GET /validations/operator/{id}`
///
/// # Errors
///
/// Returns `500` if the audit query fails.
pub async fn validations_by_operator<T, I, A>(
    State(validator): State<Validator<T, I, A>>,
    Path(operator_id): Path<i64>,
) -> Result<Json<Vec<AuditRecord>>>
where
    T: TicketingDirectory,
    I: IdentityDirectory,
    A: AuditLog,
{
    Ok(Json(
        validator.audit.by_operator(OperatorId(operator_id)).await?,
    ))
}

/// `GET /validations/ticket/{id}`
///
/// # Errors
///
/// Returns `500` if the audit query fails.
pub async fn validations_by_ticket<T, I, A>(
    State(validator): State<Validator<T, I, A>>,
    Path(ticket_id): Path<i64>,
) -> Result<Json<Vec<AuditRecord>>>
where
    T: TicketingDirectory,
    I: IdentityDirectory,
    A: AuditLog,
{
    Ok(Json(validator.audit.by_ticket(TicketId(ticket_id)).await?))
}
