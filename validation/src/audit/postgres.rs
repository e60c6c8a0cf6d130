//! PostgreSQL audit log.

use crate::error::{Result, ValidationError};
use crate::providers::AuditLog;
use crate::types::{AuditRecord, NewAuditRecord};
use chrono::{DateTime, Utc};
use olympia_core::{OperatorId, TicketId, UserId};
use sqlx::PgPool;

/// PostgreSQL audit log. Append-only: no update or delete statement
/// exists in this module.
#[derive(Debug, Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|error| ValidationError::Database(error.into()))
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    ticket_id: i64,
    user_id: i64,
    operator_id: i64,
    validated_at: DateTime<Utc>,
    is_valid: bool,
}

impl From<AuditRow> for AuditRecord {
    fn from(row: AuditRow) -> Self {
        Self {
            id: row.id,
            ticket_id: TicketId(row.ticket_id),
            user_id: UserId(row.user_id),
            operator_id: OperatorId(row.operator_id),
            validated_at: row.validated_at,
            is_valid: row.is_valid,
        }
    }
}

const COLUMNS: &str = "id, ticket_id, user_id, operator_id, validated_at, is_valid";

impl AuditLog for PostgresAuditLog {
    async fn append(&self, new: NewAuditRecord) -> Result<AuditRecord> {
        let row = sqlx::query_as::<_, AuditRow>(&format!(
            r"
            INSERT INTO validation_records (ticket_id, user_id, operator_id, is_valid)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            ",
        ))
        .bind(new.ticket_id.0)
        .bind(new.user_id.0)
        .bind(new.operator_id.0)
        .bind(new.is_valid)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<AuditRecord>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {COLUMNS} FROM validation_records ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AuditRecord::from).collect())
    }

    async fn by_operator(&self, operator_id: OperatorId) -> Result<Vec<AuditRecord>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {COLUMNS} FROM validation_records WHERE operator_id = $1 ORDER BY id"
        ))
        .bind(operator_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AuditRecord::from).collect())
    }

    async fn by_ticket(&self, ticket_id: TicketId) -> Result<Vec<AuditRecord>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {COLUMNS} FROM validation_records WHERE ticket_id = $1 ORDER BY id"
        ))
        .bind(ticket_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AuditRecord::from).collect())
    }
}
