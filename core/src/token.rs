//! Ticket token codec.
//!
//! The scannable payload is the delimiter-joined string
//! `"<ticketId>:<security_key_1>:<security_key_2>"`. Encoding is a plain
//! concatenation — there is no keyed signature over the triple. The
//! authority check happens online: the validation service compares both
//! presented keys against the stored records.
//!
//! Decoding is strict: exactly three `:`-separated fields, a non-negative
//! decimal ticket id with no sign, and two well-formed hex keys. Any other
//! shape is a *format* error, never a signature error, and produces no
//! audit record downstream.

use crate::secret::{KeyParseError, SecurityKey};
use crate::types::TicketId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field delimiter in the token payload.
pub const FIELD_DELIMITER: char = ':';

/// Number of fields in a well-formed payload.
pub const FIELD_COUNT: usize = 3;

/// Error returned when a presented payload does not have the documented
/// shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenFormatError {
    /// Payload did not split into exactly three fields.
    #[error("expected {FIELD_COUNT} colon-separated fields, got {found}")]
    WrongFieldCount {
        /// Number of fields actually present.
        found: usize,
    },

    /// First field was not a non-negative decimal integer.
    #[error("ticket id is not a non-negative integer")]
    InvalidTicketId,

    /// A key field was not a fixed-length hex string.
    #[error("malformed security key: {0}")]
    InvalidKey(#[from] KeyParseError),
}

/// The decoded triple carried by a scannable ticket credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketToken {
    /// Ticket identifier.
    pub ticket_id: TicketId,
    /// The holder's identity secret (`security_key_1`).
    pub identity_key: SecurityKey,
    /// The per-ticket secret (`security_key_2`).
    pub ticket_key: SecurityKey,
}

impl TicketToken {
    /// Combine a ticket id and both secrets into a token.
    #[must_use]
    pub const fn new(
        ticket_id: TicketId,
        identity_key: SecurityKey,
        ticket_key: SecurityKey,
    ) -> Self {
        Self {
            ticket_id,
            identity_key,
            ticket_key,
        }
    }

    /// Render the wire payload: `"<id>:<key1>:<key2>"`.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.ticket_id,
            self.identity_key.as_str(),
            self.ticket_key.as_str()
        )
    }
}

impl fmt::Display for TicketToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display the id only; the keys stay out of logs.
        write!(f, "TicketToken(ticket_id={})", self.ticket_id)
    }
}

impl FromStr for TicketToken {
    type Err = TokenFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(FIELD_DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(TokenFormatError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let ticket_id = parse_ticket_id(fields[0])?;
        let identity_key: SecurityKey = fields[1].parse()?;
        let ticket_key: SecurityKey = fields[2].parse()?;

        Ok(Self {
            ticket_id,
            identity_key,
            ticket_key,
        })
    }
}

/// Parse the first payload field: decimal digits only, no sign.
///
/// `i64::from_str` would accept a leading `+` or `-`; the wire format
/// does not.
fn parse_ticket_id(field: &str) -> Result<TicketId, TokenFormatError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TokenFormatError::InvalidTicketId);
    }
    field
        .parse::<i64>()
        .map(TicketId)
        .map_err(|_| TokenFormatError::InvalidTicketId)
}
