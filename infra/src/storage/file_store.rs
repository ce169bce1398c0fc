//! Durable session store keeping each key in its own file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use th_core::domain::entities::user::UserRecord;
use th_core::domain::value_objects::auth_payload::PersistedSession;
use th_core::errors::StorageError;
use th_core::store::SessionStore;
use th_shared::config::StorageConfig;

/// Session store writing the credential trio under a namespaced file
/// per key
///
/// Callers only see whole-trio operations; an unreadable or corrupt
/// file loads as `None` for that field and the verification path
/// resolves the ambiguity.
pub struct FileStore {
    dir: PathBuf,
    namespace: String,
}

impl FileStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.dir).map_err(io_error)?;
        Ok(Self {
            dir: config.dir.clone(),
            namespace: config.namespace.clone(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.namespace, key))
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "stored key unreadable, treating as absent");
                None
            }
        }
    }

    fn write_key(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        match value {
            Some(value) => fs::write(self.key_path(key), value).map_err(io_error),
            None => remove_if_present(&self.key_path(key)),
        }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<PersistedSession, StorageError> {
        let user = self.read_key("user").and_then(|raw| {
            serde_json::from_str::<UserRecord>(&raw)
                .map_err(|e| warn!(error = %e, "stored user record corrupt, treating as absent"))
                .ok()
        });

        Ok(PersistedSession {
            access_token: self.read_key("access_token"),
            refresh_token: self.read_key("refresh_token"),
            user,
        })
    }

    fn persist(&self, session: &PersistedSession) -> Result<(), StorageError> {
        let user_json = session
            .user
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::Serialization {
                message: e.to_string(),
            })?;

        self.write_key("access_token", session.access_token.as_deref())?;
        self.write_key("refresh_token", session.refresh_token.as_deref())?;
        self.write_key("user", user_json.as_deref())
    }

    fn clear(&self) -> Result<(), StorageError> {
        remove_if_present(&self.key_path("access_token"))?;
        remove_if_present(&self.key_path("refresh_token"))?;
        remove_if_present(&self.key_path("user"))
    }
}

fn io_error(error: std::io::Error) -> StorageError {
    StorageError::Io {
        message: error.to_string(),
    }
}

fn remove_if_present(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(e)),
    }
}
