//! In-memory identity store.

use crate::error::{IdentityError, Result};
use crate::providers::IdentityRepository;
use crate::types::{Identity, NewIdentity};
use chrono::Utc;
use olympia_core::{SecurityKey, UserId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory identity store.
///
/// Used for tests and for running the service without a database.
/// Ids are assigned monotonically starting at 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    identities: BTreeMap<i64, Identity>,
    next_id: i64,
}

impl MemoryIdentityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityRepository for MemoryIdentityStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity> {
        let mut inner = self.inner.lock().map_err(|_| IdentityError::Internal)?;

        if inner
            .identities
            .values()
            .any(|identity| identity.email == new.email)
        {
            return Err(IdentityError::EmailTaken);
        }

        inner.next_id += 1;
        let identity = Identity {
            id: UserId(inner.next_id),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            security_key_1: SecurityKey::generate(),
            is_staff: new.is_staff,
            is_admin: new.is_admin,
            created_at: Utc::now(),
        };
        inner.identities.insert(identity.id.0, identity.clone());
        Ok(identity)
    }

    async fn get(&self, id: UserId) -> Result<Identity> {
        self.inner
            .lock()
            .map_err(|_| IdentityError::Internal)?
            .identities
            .get(&id.0)
            .cloned()
            .ok_or(IdentityError::IdentityNotFound)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Identity>> {
        let inner = self.inner.lock().map_err(|_| IdentityError::Internal)?;
        Ok(inner
            .identities
            .values()
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}
