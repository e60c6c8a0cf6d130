//! # Olympia Core
//!
//! Shared domain vocabulary for the Olympia ticketing platform.
//!
//! Every service crate (gateway, identity, ticketing, validation) depends
//! on this crate for the pieces of the ticket integrity subsystem that
//! must agree across process boundaries:
//!
//! - **Secrets**: [`SecurityKey`] — the two unguessable keys that together
//!   authorize a physical ticket (`security_key_1` bound to an identity,
//!   `security_key_2` bound to a ticket).
//! - **Token codec**: [`TicketToken`] — the `"<id>:<key1>:<key2>"` payload
//!   carried inside the scannable QR image, and its strict decoder.
//! - **QR rendering**: [`qr::render_png_data_uri`] — the embeddable
//!   `data:image/png;base64,` blob handed to ticket holders.
//! - **Wire shapes**: the record types exchanged between services.
//!
//! The token payload is deliberately a plain concatenation with no keyed
//! signature over the triple: its trustworthiness rests on the two secrets
//! being hard to guess and on the validation service cross-checking them
//! against stored records.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod qr;
pub mod secret;
pub mod token;
pub mod types;

// Re-export main types for convenience
pub use qr::QrError;
pub use secret::{KeyParseError, SecurityKey};
pub use token::{TicketToken, TokenFormatError};
pub use types::{
    IdentitySummary, OfferId, OfferSummary, OperatorId, TicketId, TicketRecord, UserId,
};
