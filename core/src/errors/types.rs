//! Error type definitions for session, gateway, storage, and module
//! boundary operations.
//!
//! The session expiry policy depends on telling authentication-class
//! rejections apart from availability failures, so `GatewayError` keeps
//! the two families in separate variants and exposes classifiers.

use thiserror::Error;

use crate::domain::entities::user::UserRole;

/// Authentication and session lifecycle errors
///
/// Recoverable variants are surfaced inline on the originating form and
/// never mutate stored credentials. `SessionExpired` is terminal and
/// carries the prior role purely for redirect targeting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Malformed sign-in redirect")]
    MalformedRedirect,

    #[error("Sign-in provider rejected the request: {message}")]
    ProviderRejected { message: String },

    #[error("Session expired")]
    SessionExpired { prior_role: Option<UserRole> },
}

/// Errors returned by the identity gateway
///
/// `AuthInvalid` is the only trigger for the refresh-or-expire path;
/// everything transport-shaped is transient and must never force a
/// logout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Authentication rejected")]
    AuthInvalid,

    #[error("Request rejected: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Service unavailable (status {status})")]
    Unavailable { status: u16 },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {message}")]
    Network { message: String },
}

impl GatewayError {
    /// True for explicit 401/403-class rejections
    pub fn is_auth_invalid(&self) -> bool {
        matches!(self, GatewayError::AuthInvalid)
    }

    /// True for availability failures that must leave the session untouched
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Unavailable { .. } | GatewayError::Timeout | GatewayError::Network { .. }
        )
    }
}

/// Durable session store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error: {message}")]
    Io { message: String },

    #[error("Stored value could not be serialized: {message}")]
    Serialization { message: String },
}

/// Remote module boundary errors
///
/// Contained by the module host; never propagated out of the boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModuleError {
    #[error("Module load failed: {message}")]
    LoadFailed { message: String },

    #[error("Module mount failed: {message}")]
    MountFailed { message: String },

    #[error("Module panicked during mount or update")]
    Panicked,
}
