//! Shared utilities and common types for the TalentHub shell
//!
//! This crate provides functionality used across all shell workspace members:
//! - Configuration types
//! - Validation utilities (email, names)
//! - URL sanitization helpers for redirect handling

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    Environment, IdentityConfig, LoggingConfig, ModalConfig, ModuleConfig, ShellConfig,
    StorageConfig,
};
pub use utils::{url_sanitize, validation};
