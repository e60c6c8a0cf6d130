//! # Olympia Identity
//!
//! Registration and identity lookup for the Olympia ticketing platform.
//!
//! At registration every identity receives `security_key_1`, a 256-bit
//! hex secret generated exactly once and never rotated. The key is the
//! first of the two secrets bound into a ticket's QR token. Public
//! routes serve a profile shape that omits the key; only the internal
//! route (reachable by the validation service, never through the public
//! gateway) serves the full record.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod routes;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use config::IdentityConfig;
pub use error::{IdentityError, Result};
pub use providers::IdentityRepository;
pub use routes::build_router;
pub use store::{MemoryIdentityStore, PostgresIdentityStore};
pub use types::{Identity, IdentityProfile, NewIdentity};
