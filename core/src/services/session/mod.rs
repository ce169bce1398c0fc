//! Session service module
//!
//! Owns the authentication state machine: login, registration, OAuth
//! redirect hydration, verification-on-mount, silent refresh, expiry,
//! and the persistence invariant that the credential trio is always
//! written or cleared as a unit.

mod service;

#[cfg(test)]
mod tests;

pub use service::{
    OAuthOutcome, RedirectConsumption, RefreshOutcome, SessionService, VerifyOutcome,
};
