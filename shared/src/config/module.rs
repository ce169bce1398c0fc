//! Remote module configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the independently deployed remote module
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModuleConfig {
    /// URL of the remote module's version manifest
    pub manifest_url: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            manifest_url: String::from("http://localhost:4100/module/manifest.json"),
        }
    }
}

impl ModuleConfig {
    /// Read the module configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            manifest_url: env::var("MODULE_MANIFEST_URL").unwrap_or(defaults.manifest_url),
        }
    }
}
