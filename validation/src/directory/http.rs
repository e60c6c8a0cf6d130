//! HTTP clients for the ticketing and identity services.
//!
//! Timeouts map to not-found: a slow upstream can only deny a scan.
//! Any other transport failure is surfaced as an upstream error.

use crate::error::{Result, ValidationError};
use crate::providers::{IdentityDirectory, MarkOutcome, TicketingDirectory};
use chrono::{DateTime, Utc};
use olympia_core::{IdentitySummary, OfferId, OfferSummary, TicketId, TicketRecord, UserId};
use reqwest::StatusCode;
use serde_json::json;

fn upstream(service: &'static str) -> impl FnOnce(reqwest::Error) -> ValidationError {
    move |source| {
        if source.is_timeout() {
            ValidationError::TicketNotFound
        } else {
            ValidationError::Upstream { service, source }
        }
    }
}

/// HTTP client for the ticketing service.
#[derive(Debug, Clone)]
pub struct HttpTicketingDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTicketingDirectory {
    /// Create a client against a ticketing service base URL.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl TicketingDirectory for HttpTicketingDirectory {
    async fn ticket(&self, id: TicketId) -> Result<TicketRecord> {
        let url = format!("{}/internal/tickets/{id}", self.base_url);
        let response = self.http.get(&url).send().await.map_err(upstream("tickets"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ValidationError::TicketNotFound);
        }

        response
            .error_for_status()
            .map_err(upstream("tickets"))?
            .json()
            .await
            .map_err(upstream("tickets"))
    }

    async fn offer(&self, id: OfferId) -> Result<OfferSummary> {
        let url = format!("{}/offers/{id}", self.base_url);
        let response = self.http.get(&url).send().await.map_err(upstream("tickets"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ValidationError::TicketNotFound);
        }

        response
            .error_for_status()
            .map_err(upstream("tickets"))?
            .json()
            .await
            .map_err(upstream("tickets"))
    }

    async fn mark_used(&self, id: TicketId, used_at: DateTime<Utc>) -> Result<MarkOutcome> {
        let url = format!("{}/internal/tickets/{id}/use", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "used_at": used_at }))
            .send()
            .await
            .map_err(|source| ValidationError::Upstream {
                service: "tickets",
                source,
            })?;

        match response.status() {
            StatusCode::CONFLICT => Ok(MarkOutcome::AlreadyUsed),
            StatusCode::NOT_FOUND => Ok(MarkOutcome::NotFound),
            _ => {
                response
                    .error_for_status()
                    .map_err(|source| ValidationError::Upstream {
                        service: "tickets",
                        source,
                    })?;
                Ok(MarkOutcome::Marked)
            }
        }
    }
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
        let response = self.http.get(&url).send().await.map_err(upstream("auth"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ValidationError::TicketNotFound);
        }

        response
            .error_for_status()
            .map_err(upstream("auth"))?
            .json()
            .await
            .map_err(upstream("auth"))
    }
}
