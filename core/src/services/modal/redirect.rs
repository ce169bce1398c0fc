//! Payment-checkout redirect markers
//!
//! The external checkout flow returns to the shell with `checkout` and
//! `role` query parameters. They are inspected once at mount and must
//! be stripped from the URL afterwards so reload or back-navigation
//! cannot replay the same modal chain.

use std::str::FromStr;

use crate::domain::entities::user::UserRole;

/// A checkout marker parsed out of the current URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutSignal {
    /// `checkout=success&role=...`
    Success { role: UserRole },
    /// `checkout=cancelled`
    Cancelled,
}

impl CheckoutSignal {
    /// Parse the markers from decoded query parameters
    ///
    /// A success marker without a recognizable role is ignored rather
    /// than guessed at.
    pub fn from_params(
        params: &std::collections::HashMap<String, String>,
    ) -> Option<CheckoutSignal> {
        match params.get("checkout").map(String::as_str) {
            Some("cancelled") => Some(CheckoutSignal::Cancelled),
            Some("success") => params
                .get("role")
                .and_then(|r| UserRole::from_str(r).ok())
                .map(|role| CheckoutSignal::Success { role }),
            _ => None,
        }
    }
}

/// What consuming a checkout redirect decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The URL carried no checkout marker
    Absent,
    /// A completed purchase; `chained` records whether profile
    /// completion will follow the confirmation modal
    Confirmed { role: UserRole, chained: bool },
    /// The user backed out of checkout
    Cancelled,
}

/// Outcome plus the path-only URL the caller must install so the
/// markers cannot replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConsumption {
    pub outcome: CheckoutOutcome,
    pub sanitized_url: String,
}
