//! Identity service configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Identity service configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// PostgreSQL connection string. When absent the service falls back
    /// to the in-memory store.
    pub database_url: Option<String>,
}

impl IdentityConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL").ok(),
        }
    }
}
