//! Credential trio value objects.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserRecord;

/// The trio delivered by a successful login, registration, or OAuth
/// redirect: both tokens plus the user record. Always handled as a unit
/// so persistence can never be partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Short-lived access credential
    pub access_token: String,

    /// Longer-lived refresh credential
    pub refresh_token: String,

    /// The authenticated user's record
    pub user: UserRecord,
}

impl AuthPayload {
    /// The stored form of this payload
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            access_token: Some(self.access_token.clone()),
            refresh_token: Some(self.refresh_token.clone()),
            user: Some(self.user.clone()),
        }
    }
}

/// The persisted client state: three independent keys treated as a
/// single logical transaction by every caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Stored access token, if any
    pub access_token: Option<String>,

    /// Stored refresh token, if any
    pub refresh_token: Option<String>,

    /// Stored serialized user record, if any
    pub user: Option<UserRecord>,
}

impl PersistedSession {
    /// An entirely empty trio
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no key holds a value
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}
