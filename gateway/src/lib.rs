//! # Olympia Gateway
//!
//! The edge of the Olympia ticketing platform. Every inbound request
//! passes through admission control (a per-client-IP sliding-window
//! limiter) before being proxied to the backend service selected by its
//! path prefix.
//!
//! ## Admission control
//!
//! Two independently configured limiter instances exist: a strict one for
//! authentication endpoints (to slow credential guessing) and a larger
//! one for general API traffic. Rejected requests receive `429` with a
//! computed `Retry-After`; every response carries `X-RateLimit-Limit`,
//! `X-RateLimit-Remaining` and `X-RateLimit-Reset`.
//!
//! Limiter state is process-local: behind `n` workers the effective
//! global limit is `n ×` the configured limit. This is an accepted
//! weakening — the guarantee is "slow down abuse", not an exact quota.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod client_ip;
pub mod config;
pub mod error;
pub mod limiter;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod security;

// Re-export main types for convenience
pub use config::GatewayConfig;
pub use limiter::{AdmissionDecision, SlidingWindowLimiter};
pub use middleware::{admission_layer, AdmissionControl};
pub use proxy::{GatewayState, Upstreams};
pub use routes::build_router;
