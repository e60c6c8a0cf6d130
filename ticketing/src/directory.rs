//! Identity directory client.
//!
//! The QR endpoint needs the holder's `security_key_1`, which only the
//! identity service knows. This trait is the seam: production uses the
//! HTTP client against the identity service's internal route, tests use
//! the in-memory implementation.

use crate::error::{Result, TicketingError};
use olympia_core::{IdentitySummary, UserId};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Read access to identity records, including `security_key_1`.
pub trait IdentityDirectory: Clone + Send + Sync + 'static {
    /// Fetch the full identity record.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Identity not found → `TicketingError::IdentityNotFound`
    /// - Identity service unreachable → `TicketingError::IdentityUnavailable`
    fn identity(&self, id: UserId) -> impl Future<Output = Result<IdentitySummary>> + Send;
}

/// HTTP client for the identity service's internal route.
#[derive(Debug, Clone)]
pub struct HttpIdentityDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityDirectory {
    /// Create a client against an identity service base URL.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl IdentityDirectory for HttpIdentityDirectory {
    async fn identity(&self, id: UserId) -> Result<IdentitySummary> {
        let url = format!("{}/internal/identities/{id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(TicketingError::IdentityUnavailable)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(TicketingError::IdentityNotFound);
        }

        response
            .error_for_status()
            .map_err(TicketingError::IdentityUnavailable)?
            .json()
            .await
            .map_err(TicketingError::IdentityUnavailable)
    }
}

/// In-memory identity directory for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityDirectory {
    identities: Arc<Mutex<HashMap<UserId, IdentitySummary>>>,
}

impl MemoryIdentityDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an identity record.
    ///
    /// # Errors
    ///
    /// Returns error if the directory lock is poisoned.
    pub fn insert(&self, identity: IdentitySummary) -> Result<()> {
        self.identities
            .lock()
            .map_err(|_| TicketingError::Internal)?
            .insert(identity.id, identity);
        Ok(())
    }
}

impl IdentityDirectory for MemoryIdentityDirectory {
    async fn identity(&self, id: UserId) -> Result<IdentitySummary> {
        self.identities
            .lock()
            .map_err(|_| TicketingError::Internal)?
            .get(&id)
            .cloned()
            .ok_or(TicketingError::IdentityNotFound)
    }
}
