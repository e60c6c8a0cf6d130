//! # Olympia Validation
//!
//! Gate-side scan verification for the Olympia ticketing platform.
//!
//! A scan presents the raw `"<ticketId>:<key1>:<key2>"` payload decoded
//! from a ticket's QR code. The validator fetches the authoritative
//! records from the identity and ticketing services, compares both
//! presented secrets against the stored ones in constant time, and then
//! consumes the ticket through the ticketing service's atomic mark-used
//! transition, so concurrent scans of the same ticket admit exactly one
//! holder. Every scan that reaches secret verification leaves exactly
//! one row in the append-only audit trail.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod audit;
pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod routes;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use audit::{MemoryAuditLog, PostgresAuditLog};
pub use config::ValidationConfig;
pub use directory::{
    HttpIdentityDirectory, HttpTicketingDirectory, MemoryIdentityDirectory,
    MemoryTicketingDirectory,
};
pub use error::{Result, ValidationError};
pub use providers::{AuditLog, IdentityDirectory, MarkOutcome, TicketingDirectory};
pub use routes::build_router;
pub use types::{AuditRecord, NewAuditRecord, ValidationReport, ValidationRequest};
pub use validator::Validator;
