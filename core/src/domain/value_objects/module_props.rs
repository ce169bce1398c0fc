//! Module boundary props: the read-only session snapshot handed to the
//! remote module.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::user::{Plan, UserRole, VisibilityGrant};

/// Read-only snapshot of session fields passed to the hosted module once
/// per session change.
///
/// This is the entire contract in the shell-to-module direction: the
/// module never receives the session service itself, and any mutation it
/// wants to trigger must go through the event channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleProps {
    /// Access token for authenticated requests the module makes itself
    pub access_token: Option<String>,

    /// Marketplace role of the signed-in user
    pub role: Option<UserRole>,

    /// User id
    pub user_id: Option<Uuid>,

    /// Account email
    pub email: Option<String>,

    /// Display name
    pub username: Option<String>,

    /// Subscription plan
    pub plan: Option<Plan>,

    /// Visibility grant, when the user holds one
    pub visibility: Option<VisibilityGrant>,

    /// Whether a visibility purchase has ever completed
    pub has_purchased_visibility: bool,
}

impl ModuleProps {
    /// Props for an anonymous session: all fields absent
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when the snapshot carries a signed-in identity
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user_id.is_some()
    }
}
