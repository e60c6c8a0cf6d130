//! Identity records and request/response shapes.

use chrono::{DateTime, Utc};
use olympia_core::{IdentitySummary, SecurityKey, UserId};
use serde::{Deserialize, Serialize};

/// Full identity record as held by the store.
///
/// Carries `security_key_1`. Only the internal route serves this shape
/// (as an [`IdentitySummary`]); public routes serve [`IdentityProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity identifier, assigned by the store.
    pub id: UserId,
    /// Unique identity handle.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Secret issued at registration, generated exactly once and never
    /// rotated.
    pub security_key_1: SecurityKey,
    /// Staff flag.
    pub is_staff: bool,
    /// Administrator flag.
    pub is_admin: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Internal-route shape, with the registration secret.
    #[must_use]
    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            security_key_1: self.security_key_1.clone(),
            is_staff: self.is_staff,
            is_admin: self.is_admin,
        }
    }

    /// Public-route shape, without the registration secret.
    #[must_use]
    pub fn profile(&self) -> IdentityProfile {
        IdentityProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_staff: self.is_staff,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

/// Public identity shape. Never carries `security_key_1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// Identity identifier.
    pub id: UserId,
    /// Unique identity handle.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Staff flag.
    pub is_staff: bool,
    /// Administrator flag.
    pub is_admin: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIdentity {
    /// Unique identity handle.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Staff flag.
    #[serde(default)]
    pub is_staff: bool,
    /// Administrator flag.
    #[serde(default)]
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn sample() -> Identity {
        Identity {
            id: UserId(1),
            email: "marie.curie@example.fr".to_string(),
            first_name: "Marie".to_string(),
            last_name: "Curie".to_string(),
            security_key_1: SecurityKey::generate(),
            is_staff: false,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn profile_never_carries_the_key() {
        let identity = sample();
        let json = serde_json::to_value(identity.profile()).unwrap();
        assert!(json.get("security_key_1").is_none());
        assert_eq!(json["email"], "marie.curie@example.fr");
    }

    #[test]
    fn summary_carries_the_key() {
        let identity = sample();
        let summary = identity.summary();
        assert_eq!(summary.security_key_1, identity.security_key_1);
    }

    #[test]
    fn new_identity_flags_default_to_false() {
        let body: NewIdentity = serde_json::from_value(serde_json::json!({
            "email": "a@b.fr",
            "first_name": "A",
            "last_name": "B",
        }))
        .unwrap();
        assert!(!body.is_staff);
        assert!(!body.is_admin);
    }
}
