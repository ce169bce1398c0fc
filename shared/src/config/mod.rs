//! Configuration module with per-concern sub-modules
//!
//! Configuration is organized by shell concern:
//! - `environment` - Environment detection and logging configuration
//! - `identity` - Identity service endpoints and timeouts
//! - `storage` - Durable session storage location
//! - `module` - Remote module manifest location
//! - `modal` - Modal sequencing timings

pub mod environment;
pub mod identity;
pub mod modal;
pub mod module;
pub mod storage;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use environment::{Environment, LoggingConfig};
pub use identity::IdentityConfig;
pub use modal::ModalConfig;
pub use module::ModuleConfig;
pub use storage::StorageConfig;

/// Complete shell configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShellConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Identity service configuration
    pub identity: IdentityConfig,

    /// Session storage configuration
    pub storage: StorageConfig,

    /// Remote module configuration
    pub module: ModuleConfig,

    /// Modal sequencing configuration
    #[serde(default)]
    pub modal: ModalConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            identity: IdentityConfig::default(),
            storage: StorageConfig::default(),
            module: ModuleConfig::default(),
            modal: ModalConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl ShellConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        Self {
            environment: env,
            identity: IdentityConfig::from_env(),
            storage: StorageConfig::from_env(),
            module: ModuleConfig::from_env(),
            modal: ModalConfig::from_env(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}
