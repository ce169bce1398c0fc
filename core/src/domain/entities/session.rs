//! Session entity and lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::{UserRecord, UserRole};
use crate::domain::value_objects::auth_payload::{AuthPayload, PersistedSession};
use crate::domain::value_objects::module_props::ModuleProps;

/// Lifecycle state of the client session
///
/// Transitions are owned by the session service:
/// `Anonymous` to `Verifying` to `Authenticated`; `Authenticated` to
/// `Refreshing`, then back to `Authenticated` or on to `Expired`; and
/// `Expired` to `Anonymous` after cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No credentials held
    Anonymous,
    /// Tokens restored from storage, validity unconfirmed
    Verifying,
    /// Tokens confirmed valid
    Authenticated,
    /// Access token rejected, silent renewal in flight
    Refreshing,
    /// Renewal failed; credentials cleared. Remembers the prior role
    /// purely so the caller can redirect to the matching entry point.
    Expired { prior_role: Option<UserRole> },
}

/// The client-held representation of the current identity and credentials
///
/// Invariant: `access_token` is present iff the lifecycle is one of
/// `Authenticated`, `Verifying`, `Refreshing`. `Anonymous` and `Expired`
/// carry no tokens and no user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Short-lived credential attached to authenticated requests
    pub access_token: Option<String>,

    /// Longer-lived credential used only to mint a new access token
    pub refresh_token: Option<String>,

    /// Cached profile; absent iff not authenticated
    pub user: Option<UserRecord>,

    /// Current lifecycle state
    pub lifecycle: LifecycleState,
}

impl Session {
    /// The initial, credential-less session
    pub fn anonymous() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            user: None,
            lifecycle: LifecycleState::Anonymous,
        }
    }

    /// Session created from a successful login, registration, or OAuth
    /// redirect payload
    pub fn authenticated(payload: AuthPayload) -> Self {
        Self {
            access_token: Some(payload.access_token),
            refresh_token: Some(payload.refresh_token),
            user: Some(payload.user),
            lifecycle: LifecycleState::Authenticated,
        }
    }

    /// Session hydrated from storage at startup
    ///
    /// Tokens restored from storage start in `Verifying`; an empty store
    /// yields an anonymous session.
    pub fn from_persisted(persisted: PersistedSession) -> Self {
        if persisted.access_token.is_some() {
            Self {
                access_token: persisted.access_token,
                refresh_token: persisted.refresh_token,
                user: persisted.user,
                lifecycle: LifecycleState::Verifying,
            }
        } else {
            Self::anonymous()
        }
    }

    /// Whether the session currently holds confirmed-or-pending credentials
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some()
    }

    /// Terminal expiry: clears everything, remembering the prior role
    /// for redirect targeting. Returns that role.
    pub fn expire(&mut self) -> Option<UserRole> {
        let prior_role = self.user.as_ref().map(|u| u.role);
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.lifecycle = LifecycleState::Expired { prior_role };
        prior_role
    }

    /// Reset to anonymous (explicit sign-out or post-expiry cleanup)
    pub fn reset(&mut self) {
        *self = Self::anonymous();
    }

    /// The stored form of this session's credential trio
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
        }
    }

    /// Read-only snapshot handed to the remote module as explicit input.
    /// Anonymous sessions yield empty props.
    pub fn module_props(&self) -> ModuleProps {
        match (&self.access_token, &self.user) {
            (Some(token), Some(user)) => ModuleProps {
                access_token: Some(token.clone()),
                role: Some(user.role),
                user_id: Some(user.id),
                email: Some(user.email.clone()),
                username: Some(user.display_name()),
                plan: Some(user.plan),
                visibility: user.visibility.clone(),
                has_purchased_visibility: user.has_purchased_visibility,
            },
            _ => ModuleProps::anonymous(),
        }
    }

    /// Checks the token/lifecycle invariant; used by tests and debug
    /// assertions after transitions.
    pub fn invariant_holds(&self) -> bool {
        let token_states = matches!(
            self.lifecycle,
            LifecycleState::Authenticated | LifecycleState::Verifying | LifecycleState::Refreshing
        );
        if token_states {
            self.access_token.is_some()
        } else {
            self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}
