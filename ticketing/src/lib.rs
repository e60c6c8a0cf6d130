//! # Olympia Ticketing
//!
//! Offer catalog, ticket purchase and QR credential issuance.
//!
//! At purchase every ticket receives `security_key_2`, a 256-bit hex
//! secret generated exactly once. The QR endpoint joins it with the
//! holder's `security_key_1` (fetched from the identity service) into
//! the `"<ticketId>:<key1>:<key2>"` payload and renders it as a PNG
//! data URI. The internal mark-used route is the only writer of the
//! `is_used` flag, and the transition is atomic: of any number of
//! concurrent attempts, exactly one succeeds.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod routes;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use config::TicketingConfig;
pub use directory::{HttpIdentityDirectory, IdentityDirectory, MemoryIdentityDirectory};
pub use error::{Result, TicketingError};
pub use handlers::TicketingState;
pub use providers::{MarkUsedOutcome, TicketingStore};
pub use routes::build_router;
pub use store::{MemoryTicketingStore, PostgresTicketingStore};
pub use types::{NewOffer, NewTicket, Offer, QrResponse, SalesSummary};
