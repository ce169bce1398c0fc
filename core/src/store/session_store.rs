//! Session store trait defining the interface for credential persistence.

use crate::domain::value_objects::auth_payload::PersistedSession;
use crate::errors::StorageError;

/// Durable, synchronous key-value persistence for the access token,
/// refresh token, and cached user record.
///
/// The three values live under independent keys, but this trait only
/// exposes whole-trio operations: no call site can write one field
/// without the others, so a reader never observes one key updated while
/// another is stale.
pub trait SessionStore: Send + Sync {
    /// Load whatever trio is currently stored
    ///
    /// A key that is missing or unreadable loads as `None` for that
    /// field; the verification path resolves any resulting ambiguity.
    fn load(&self) -> Result<PersistedSession, StorageError>;

    /// Write all three keys as one logical transaction
    fn persist(&self, session: &PersistedSession) -> Result<(), StorageError>;

    /// Remove all three keys
    fn clear(&self) -> Result<(), StorageError>;
}
