//! Gateway configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::proxy::Upstreams;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Identity service base URL.
    pub auth_service_url: String,
    /// Ticketing service base URL.
    pub tickets_service_url: String,
    /// Validation service base URL.
    pub validation_service_url: String,
    /// Authentication endpoints: max admitted requests per window.
    pub auth_rate_limit: u32,
    /// Authentication endpoints: window size in seconds.
    pub auth_rate_window: u64,
    /// General API traffic: max admitted requests per window.
    pub api_rate_limit: u32,
    /// General API traffic: window size in seconds.
    pub api_rate_window: u64,
    /// Upstream request timeout in seconds.
    pub upstream_timeout: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            auth_service_url: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            tickets_service_url: env::var("TICKETS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            validation_service_url: env::var("VALIDATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            // 5 authentication attempts per minute slows credential
            // guessing; 60 general requests per minute per client.
            auth_rate_limit: env::var("AUTH_RATE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            auth_rate_window: env::var("AUTH_RATE_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            api_rate_limit: env::var("API_RATE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            api_rate_window: env::var("API_RATE_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            upstream_timeout: env::var("UPSTREAM_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Upstream base URLs for the proxy.
    #[must_use]
    pub fn upstreams(&self) -> Upstreams {
        Upstreams {
            auth: self.auth_service_url.clone(),
            tickets: self.tickets_service_url.clone(),
            validation: self.validation_service_url.clone(),
        }
    }

    /// Authentication limiter window.
    #[must_use]
    pub const fn auth_window(&self) -> Duration {
        Duration::from_secs(self.auth_rate_window)
    }

    /// General API limiter window.
    #[must_use]
    pub const fn api_window(&self) -> Duration {
        Duration::from_secs(self.api_rate_window)
    }
}
