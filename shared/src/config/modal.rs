//! Modal sequencing configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Configuration for modal chaining behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModalConfig {
    /// Delay in milliseconds between closing one modal and opening the
    /// next chained one. Long enough for the closing modal to fully
    /// unmount; not synchronized with anything else.
    #[serde(default = "default_chain_delay_ms")]
    pub chain_delay_ms: u64,
}

fn default_chain_delay_ms() -> u64 {
    300
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            chain_delay_ms: default_chain_delay_ms(),
        }
    }
}

impl ModalConfig {
    /// Read the modal configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chain_delay_ms: env::var("MODAL_CHAIN_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.chain_delay_ms),
        }
    }

    /// The chain delay as a `Duration`
    pub fn chain_delay(&self) -> Duration {
        Duration::from_millis(self.chain_delay_ms)
    }
}
