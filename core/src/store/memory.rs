//! In-memory session store for tests and ephemeral runs.

use std::sync::Mutex;

use crate::domain::value_objects::auth_payload::PersistedSession;
use crate::errors::StorageError;

use super::session_store::SessionStore;

/// Session store backed by process memory
///
/// Does not survive a restart; used by tests and by environments without
/// a writable filesystem.
#[derive(Default)]
pub struct MemoryStore {
    trio: Mutex<PersistedSession>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a trio (test convenience)
    pub fn seeded(session: PersistedSession) -> Self {
        Self {
            trio: Mutex::new(session),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<PersistedSession, StorageError> {
        Ok(self.trio.lock().expect("memory store poisoned").clone())
    }

    fn persist(&self, session: &PersistedSession) -> Result<(), StorageError> {
        *self.trio.lock().expect("memory store poisoned") = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.trio.lock().expect("memory store poisoned") = PersistedSession::empty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_then_load_round_trip() {
        let store = MemoryStore::new();
        let trio = PersistedSession {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            user: None,
        };

        store.persist(&trio).unwrap();
        assert_eq!(store.load().unwrap(), trio);
    }

    #[test]
    fn test_clear_empties_all_keys() {
        let store = MemoryStore::seeded(PersistedSession {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            user: None,
        });

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
