//! PostgreSQL ticketing store.

use crate::error::{Result, TicketingError};
use crate::providers::{MarkUsedOutcome, TicketingStore};
use crate::types::{NewOffer, NewTicket, Offer, SalesSummary};
use chrono::{DateTime, Utc};
use olympia_core::{OfferId, SecurityKey, TicketId, TicketRecord, UserId};
use sqlx::PgPool;

/// PostgreSQL ticketing store.
#[derive(Debug, Clone)]
pub struct PostgresTicketingStore {
    pool: PgPool,
}

impl PostgresTicketingStore {
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
            .map_err(|error| TicketingError::Database(error.into()))
    }
}

#[derive(sqlx::FromRow)]
struct OfferRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
    offer_type: String,
    event_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<OfferRow> for Offer {
    fn from(row: OfferRow) -> Self {
        Self {
            id: OfferId(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            quantity: row.quantity,
            offer_type: row.offer_type,
            event_date: row.event_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i64,
    user_id: i64,
    offer_id: i64,
    security_key_2: String,
    purchased_at: DateTime<Utc>,
    is_used: bool,
    used_at: Option<DateTime<Utc>>,
}

impl TryFrom<TicketRow> for TicketRecord {
    type Error = TicketingError;

    fn try_from(row: TicketRow) -> Result<Self> {
        let security_key_2 = row
            .security_key_2
            .parse::<SecurityKey>()
            .map_err(|_| TicketingError::Internal)?;
        Ok(Self {
            id: TicketId(row.id),
            user_id: UserId(row.user_id),
            offer_id: OfferId(row.offer_id),
            security_key_2,
            purchased_at: row.purchased_at,
            is_used: row.is_used,
            used_at: row.used_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SalesRow {
    offer_id: i64,
    offer_name: String,
    tickets_sold: i64,
    total_revenue: f64,
    event_date: DateTime<Utc>,
}

impl From<SalesRow> for SalesSummary {
    fn from(row: SalesRow) -> Self {
        Self {
            offer_id: OfferId(row.offer_id),
            offer_name: row.offer_name,
            tickets_sold: row.tickets_sold,
            total_revenue: row.total_revenue,
            event_date: row.event_date,
        }
    }
}

const OFFER_COLUMNS: &str =
    "id, name, description, price, quantity, offer_type, event_date, created_at, updated_at";
const TICKET_COLUMNS: &str =
    "id, user_id, offer_id, security_key_2, purchased_at, is_used, used_at";
const SALES_COLUMNS: &str = r"
    o.id AS offer_id, o.name AS offer_name,
    COUNT(t.id) AS tickets_sold,
    COUNT(t.id)::DOUBLE PRECISION * o.price AS total_revenue,
    o.event_date
";

impl TicketingStore for PostgresTicketingStore {
    async fn create_offer(&self, new: NewOffer) -> Result<Offer> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r"
            INSERT INTO offers (name, description, price, quantity, offer_type, event_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {OFFER_COLUMNS}
            ",
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.quantity)
        .bind(&new.offer_type)
        .bind(new.event_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_offer(&self, id: OfferId) -> Result<Offer> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TicketingError::OfferNotFound)?;

        Ok(row.into())
    }

    async fn list_offers(&self, skip: i64, limit: i64) -> Result<Vec<Offer>> {
        let rows = sqlx::query_as::<_, OfferRow>(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Offer::from).collect())
    }

    async fn update_offer(&self, id: OfferId, new: NewOffer) -> Result<Offer> {
        let row = sqlx::query_as::<_, OfferRow>(&format!(
            r"
            UPDATE offers
            SET name = $2, description = $3, price = $4, quantity = $5,
                offer_type = $6, event_date = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {OFFER_COLUMNS}
            ",
        ))
        .bind(id.0)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.quantity)
        .bind(&new.offer_type)
        .bind(new.event_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TicketingError::OfferNotFound)?;

        Ok(row.into())
    }

    async fn delete_offer(&self, id: OfferId) -> Result<()> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TicketingError::OfferNotFound);
        }
        Ok(())
    }

    async fn sales_summary(&self) -> Result<Vec<SalesSummary>> {
        let rows = sqlx::query_as::<_, SalesRow>(&format!(
            r"
            SELECT {SALES_COLUMNS}
            FROM offers o
            LEFT JOIN tickets t ON t.offer_id = o.id
            GROUP BY o.id
            ORDER BY o.id
            ",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SalesSummary::from).collect())
    }

    async fn offer_sales(&self, id: OfferId) -> Result<SalesSummary> {
        let row = sqlx::query_as::<_, SalesRow>(&format!(
            r"
            SELECT {SALES_COLUMNS}
            FROM offers o
            LEFT JOIN tickets t ON t.offer_id = o.id
            WHERE o.id = $1
            GROUP BY o.id
            ",
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TicketingError::OfferNotFound)?;

        Ok(row.into())
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<TicketRecord> {
        let security_key_2 = SecurityKey::generate();
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r"
            INSERT INTO tickets (user_id, offer_id, security_key_2)
            VALUES ($1, $2, $3)
            RETURNING {TICKET_COLUMNS}
            ",
        ))
        .bind(new.user_id.0)
        .bind(new.offer_id.0)
        .bind(security_key_2.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_ticket(&self, id: TicketId) -> Result<TicketRecord> {
        sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TicketingError::TicketNotFound)?
        .try_into()
    }

    async fn tickets_by_user(&self, user_id: UserId) -> Result<Vec<TicketRecord>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TicketRecord::try_from).collect()
    }

    async fn mark_used(&self, id: TicketId, used_at: DateTime<Utc>) -> Result<MarkUsedOutcome> {
        // The predicate makes the check and the write one statement;
        // concurrent calls for the same ticket race on the row lock and
        // all but one see zero affected rows.
        let result = sqlx::query(
            r"
            UPDATE tickets
            SET is_used = TRUE, used_at = $2
            WHERE id = $1 AND is_used = FALSE
            ",
        )
        .bind(id.0)
        .bind(used_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(MarkUsedOutcome::Marked);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM tickets WHERE id = $1)",
        )
        .bind(id.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(if exists {
            MarkUsedOutcome::AlreadyUsed
        } else {
            MarkUsedOutcome::NotFound
        })
    }
}
