//! HTTP handlers for the identity service.

use crate::error::Result;
use crate::providers::IdentityRepository;
use crate::types::{IdentityProfile, NewIdentity};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use olympia_core::{IdentitySummary, UserId};
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
    Json(json!({ "status": "healthy", "service": "identity" }))
}

/// `POST /users` — register an identity and issue its `security_key_1`.
///
/// The key never appears in the response; it travels only over the
/// internal route.
///
/// # Errors
///
/// Returns `400` if the email is already registered.
pub async fn create_user<R: IdentityRepository>(
    State(repo): State<R>,
    Json(new): Json<NewIdentity>,
) -> Result<(StatusCode, Json<IdentityProfile>)> {
    let identity = repo.create(new).await?;
    tracing::info!(user_id = %identity.id, "identity registered");
    Ok((StatusCode::CREATED, Json(identity.profile())))
}

/// `GET /users/{id}`
///
/// # Errors
///
/// Returns `404` if the identity does not exist.
pub async fn get_user<R: IdentityRepository>(
    State(repo): State<R>,
    Path(id): Path<i64>,
) -> Result<Json<IdentityProfile>> {
    let identity = repo.get(UserId(id)).await?;
    Ok(Json(identity.profile()))
}

/// `GET /users`
///
/// # Errors
///
/// Returns `500` if the store query fails.
pub async fn list_users<R: IdentityRepository>(
    State(repo): State<R>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<IdentityProfile>>> {
    let identities = repo.list(page.skip, page.limit).await?;
    Ok(Json(
        identities.iter().map(crate::types::Identity::profile).collect(),
    ))
}

/// `GET /internal/identities/{id}` — full record including
/// `security_key_1`, for the validation service. Must never be exposed
/// through the public gateway.
///
/// # Errors
///
/// Returns `404` if the identity does not exist.
pub async fn internal_identity<R: IdentityRepository>(
    State(repo): State<R>,
    Path(id): Path<i64>,
) -> Result<Json<IdentitySummary>> {
    let identity = repo.get(UserId(id)).await?;
    Ok(Json(identity.summary()))
}
