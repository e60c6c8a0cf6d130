//! Security key generation and comparison.
//!
//! A [`SecurityKey`] is a capability token: a 256-bit value drawn from the
//! operating system's CSPRNG and stored verbatim (not hashed — possession
//! of the value *is* the capability, unlike a password). Two independent
//! keys authorize a ticket:
//!
//! - `security_key_1` is issued once per identity at account creation and
//!   never regenerated or exposed through any read API.
//! - `security_key_2` is issued once per ticket at purchase time.
//!
//! # Security
//!
//! Keys must never be derived from guessable inputs (ticket id, user id,
//! timestamps). Comparison is constant-time so an attacker cannot learn
//! stored key material from response timing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a security key in raw bytes (256 bits of entropy).
pub const KEY_BYTES: usize = 32;

/// Length of a security key in its hex representation.
pub const KEY_HEX_CHARS: usize = KEY_BYTES * 2;

/// Error returned when parsing a security key from its hex form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// Key had the wrong number of characters.
    #[error("security key must be {KEY_HEX_CHARS} hex characters, got {found}")]
    WrongLength {
        /// Number of characters actually present.
        found: usize,
    },

    /// Key contained a character outside `[0-9a-f]`.
    #[error("security key contains non-hex characters")]
    NotHex,
}

/// An opaque 256-bit secret, represented as a fixed-length lowercase hex
/// string.
///
/// `Debug` output is redacted; use [`SecurityKey::as_str`] when the raw
/// value is genuinely needed (persistence, token encoding).
///
/// # Examples
///
/// ```
/// use olympia_core::SecurityKey;
///
/// let key = SecurityKey::generate();
/// assert_eq!(key.as_str().len(), 64);
/// assert!(key.matches(&key));
/// assert!(!key.matches(&SecurityKey::generate()));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecurityKey(String);

impl SecurityKey {
    /// Generate a fresh key from the operating system's CSPRNG.
    ///
    /// There is no error path: if the entropy source is unavailable the
    /// process aborts, which is the correct response to a fatal
    /// misconfiguration — issuing a predictable key would be a critical
    /// defect, not a recoverable error.
    #[must_use]
    pub fn generate() -> Self {
        use rand::RngCore;

        let mut bytes = [0u8; KEY_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Constant-time comparison against a presented key.
    ///
    /// Variable-time comparison (`==` on the underlying strings is fine
    /// for equality semantics but not for adversarial input) would let an
    /// attacker reconstruct a stored key byte-by-byte from response
    /// timing; `constant_time_eq` always takes the same time regardless of
    /// where the first mismatch occurs.
    #[must_use]
    pub fn matches(&self, presented: &Self) -> bool {
        constant_time_eq::constant_time_eq(self.0.as_bytes(), presented.0.as_bytes())
    }

    /// The raw hex representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SecurityKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != KEY_HEX_CHARS {
            return Err(KeyParseError::WrongLength { found: s.len() });
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(KeyParseError::NotHex);
        }
        // Normalize: keys are stored and compared lowercase.
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for SecurityKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SecurityKey> for String {
    fn from(key: SecurityKey) -> Self {
        key.0
    }
}

impl fmt::Debug for SecurityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak key material into logs.
        write!(f, "SecurityKey(redacted)")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn generated_key_is_64_lowercase_hex_chars() {
        let key = SecurityKey::generate();
        assert_eq!(key.as_str().len(), KEY_HEX_CHARS);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_keys_are_independent() {
        // Two draws from a 256-bit space colliding means the RNG is broken.
        let a = SecurityKey::generate();
        let b = SecurityKey::generate();
        assert_ne!(a, b);
        assert!(!a.matches(&b));
    }

    #[test]
    fn matches_is_reflexive_and_case_normalized() {
        let key = SecurityKey::generate();
        let upper: SecurityKey = key.as_str().to_ascii_uppercase().parse().unwrap();
        assert!(key.matches(&upper));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "abc123".parse::<SecurityKey>().unwrap_err();
        assert_eq!(err, KeyParseError::WrongLength { found: 6 });
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = "z".repeat(KEY_HEX_CHARS).parse::<SecurityKey>().unwrap_err();
        assert_eq!(err, KeyParseError::NotHex);
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = SecurityKey::generate();
        let debug = format!("{key:?}");
        assert!(!debug.contains(key.as_str()));
        assert_eq!(debug, "SecurityKey(redacted)");
    }

    #[test]
    fn serde_round_trips_verbatim() {
        let key = SecurityKey::generate();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.as_str()));
        let back: SecurityKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn serde_rejects_malformed_keys() {
        let result = serde_json::from_str::<SecurityKey>("\"not-a-key\"");
        assert!(result.is_err());
    }
}
