//! Identity service configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the external identity/session service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Base URL of the identity service API
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:4000/api/v1"),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl IdentityConfig {
    /// Read the identity configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("IDENTITY_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: env::var("IDENTITY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}
