//! Validation service configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Validation service configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// PostgreSQL connection string. When absent the service falls back
    /// to the in-memory audit log.
    pub database_url: Option<String>,
    /// Identity service base URL.
    pub auth_service_url: String,
    /// Ticketing service base URL.
    pub tickets_service_url: String,
    /// Upstream lookup timeout in seconds. Timeouts count as not-found.
    pub upstream_timeout: u64,
}

impl ValidationConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8002),
            database_url: env::var("DATABASE_URL").ok(),
            auth_service_url: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            tickets_service_url: env::var("TICKETS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            upstream_timeout: env::var("UPSTREAM_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Upstream lookup timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}
