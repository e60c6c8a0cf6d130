//! PostgreSQL identity store.

use crate::error::{IdentityError, Result};
use crate::providers::IdentityRepository;
use crate::types::{Identity, NewIdentity};
use chrono::{DateTime, Utc};
use olympia_core::{SecurityKey, UserId};
use sqlx::PgPool;

/// PostgreSQL identity store.
#[derive(Debug, Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
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
            .map_err(|error| IdentityError::Database(error.into()))
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    security_key_1: String,
    is_staff: bool,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self> {
        // A key that fails to parse means the row was written outside
        // the service; surface it as an internal error.
        let security_key_1 = row
            .security_key_1
            .parse::<SecurityKey>()
            .map_err(|_| IdentityError::Internal)?;
        Ok(Self {
            id: UserId(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            security_key_1,
            is_staff: row.is_staff,
            is_admin: row.is_admin,
            created_at: row.created_at,
        })
    }
}

impl IdentityRepository for PostgresIdentityStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity> {
        let security_key_1 = SecurityKey::generate();
        let row = sqlx::query_as::<_, IdentityRow>(
            r"
            INSERT INTO identities (email, first_name, last_name, security_key_1, is_staff, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, first_name, last_name, security_key_1, is_staff, is_admin, created_at
            ",
        )
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(security_key_1.as_str())
        .bind(new.is_staff)
        .bind(new.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => IdentityError::EmailTaken,
            _ => IdentityError::Database(error),
        })?;

        row.try_into()
    }

    async fn get(&self, id: UserId) -> Result<Identity> {
        sqlx::query_as::<_, IdentityRow>(
            r"
            SELECT id, email, first_name, last_name, security_key_1, is_staff, is_admin, created_at
            FROM identities
            WHERE id = $1
            ",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(IdentityError::IdentityNotFound)?
        .try_into()
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Identity>> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            r"
            SELECT id, email, first_name, last_name, security_key_1, is_staff, is_admin, created_at
            FROM identities
            ORDER BY id
            OFFSET $1 LIMIT $2
            ",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Identity::try_from).collect()
    }
}
