//! Durable session storage configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Configuration for the durable session store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the persisted session keys
    pub dir: PathBuf,

    /// Namespace prefix applied to every stored key, so multiple shells
    /// can share one directory without clobbering each other
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    String::from("talenthub")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".talenthub"),
            namespace: default_namespace(),
        }
    }
}

impl StorageConfig {
    /// Read the storage configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dir: env::var("SESSION_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            namespace: env::var("SESSION_STORE_NAMESPACE").unwrap_or(defaults.namespace),
        }
    }
}
