//! Identity repository trait.

use crate::error::Result;
use crate::types::{Identity, NewIdentity};
use olympia_core::UserId;
use std::future::Future;

/// Identity repository.
///
/// Abstracts over identity storage (PostgreSQL in production, in-memory
/// for tests). The store is the only place `security_key_1` is ever
/// generated: exactly once, at registration.
pub trait IdentityRepository: Clone + Send + Sync + 'static {
    /// Register a new identity, issuing its `security_key_1`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Email already registered → `IdentityError::EmailTaken`
    fn create(&self, new: NewIdentity) -> impl Future<Output = Result<Identity>> + Send;

    /// Get identity by id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Identity not found → `IdentityError::IdentityNotFound`
    fn get(&self, id: UserId) -> impl Future<Output = Result<Identity>> + Send;

    /// List identities, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list(&self, skip: i64, limit: i64) -> impl Future<Output = Result<Vec<Identity>>> + Send;
}
