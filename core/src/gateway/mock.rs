//! Mock implementation of IdentityGateway for testing.
//!
//! A small stateful fake of the identity service: it keeps accounts and
//! token tables in memory, mints predictable access tokens, counts
//! round-trips, and can be forced into a failure mode to simulate
//! outages or rejections.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::UserRecord;
use crate::domain::value_objects::auth_payload::AuthPayload;
use crate::domain::value_objects::registration::NewRegistration;
use crate::errors::GatewayError;

use super::identity::IdentityGateway;

#[derive(Default)]
struct IdentityState {
    /// email -> (password, user record)
    accounts: HashMap<String, (String, UserRecord)>,
    /// currently valid access tokens -> user id
    access_tokens: HashMap<String, Uuid>,
    /// currently valid refresh tokens -> user id
    refresh_tokens: HashMap<String, Uuid>,
    /// access tokens that the server now rejects
    rejected_access: HashSet<String>,
}

/// In-memory fake of the identity service
#[derive(Default)]
pub struct MockIdentityGateway {
    state: Mutex<IdentityState>,
    issued: AtomicUsize,
    forced_error: Mutex<Option<GatewayError>>,
    /// Round-trip counters, one per endpoint the expiry policy cares about
    pub verify_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub fetch_user_calls: AtomicUsize,
}

impl MockIdentityGateway {
    /// Create an empty fake with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account that `login` will accept
    pub fn seed_account(&self, password: &str, user: UserRecord) {
        let mut state = self.state.lock().unwrap();
        state
            .accounts
            .insert(user.email.clone(), (password.to_string(), user));
    }

    /// Seed a live token pair for a user, as if a login happened in a
    /// previous process lifetime. Returns (access, refresh).
    pub fn seed_session(&self, user: &UserRecord) -> (String, String) {
        let access = self.mint_access();
        let refresh = format!("refresh-{}", Uuid::new_v4());
        let mut state = self.state.lock().unwrap();
        state.access_tokens.insert(access.clone(), user.id);
        state.refresh_tokens.insert(refresh.clone(), user.id);
        state
            .accounts
            .entry(user.email.clone())
            .or_insert_with(|| ("password".to_string(), user.clone()));
        (access, refresh)
    }

    /// Make the server reject an access token from now on
    pub fn reject_access_token(&self, token: &str) {
        let mut state = self.state.lock().unwrap();
        state.access_tokens.remove(token);
        state.rejected_access.insert(token.to_string());
    }

    /// Make the server reject a refresh token from now on
    pub fn revoke_refresh_token(&self, token: &str) {
        self.state.lock().unwrap().refresh_tokens.remove(token);
    }

    /// Replace the stored user record (simulates an out-of-band change
    /// such as a completed purchase)
    pub fn set_user(&self, user: UserRecord) {
        let mut state = self.state.lock().unwrap();
        if let Some((_, existing)) = state.accounts.get_mut(&user.email) {
            *existing = user;
        }
    }

    /// Force every subsequent call to fail with this error until cleared
    pub fn force_error(&self, error: GatewayError) {
        *self.forced_error.lock().unwrap() = Some(error);
    }

    /// Clear a forced failure mode
    pub fn clear_error(&self) {
        *self.forced_error.lock().unwrap() = None;
    }

    fn check_forced(&self) -> Result<(), GatewayError> {
        match self.forced_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn mint_access(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        format!("access-{}", n)
    }

    fn user_by_id(&self, id: Uuid) -> Option<UserRecord> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .values()
            .find(|(_, u)| u.id == id)
            .map(|(_, u)| u.clone())
    }
}

#[async_trait]
impl IdentityGateway for MockIdentityGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, GatewayError> {
        self.check_forced()?;

        let user = {
            let state = self.state.lock().unwrap();
            match state.accounts.get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                _ => return Err(GatewayError::AuthInvalid),
            }
        };

        let access = self.mint_access();
        let refresh = format!("refresh-{}", Uuid::new_v4());
        {
            let mut state = self.state.lock().unwrap();
            state.access_tokens.insert(access.clone(), user.id);
            state.refresh_tokens.insert(refresh.clone(), user.id);
        }

        Ok(AuthPayload {
            access_token: access,
            refresh_token: refresh,
            user,
        })
    }

    async fn register(&self, registration: &NewRegistration) -> Result<AuthPayload, GatewayError> {
        self.check_forced()?;

        {
            let state = self.state.lock().unwrap();
            if state.accounts.contains_key(&registration.email) {
                return Err(GatewayError::Conflict {
                    message: "email already registered".to_string(),
                });
            }
        }

        let user = UserRecord::new(
            registration.email.clone(),
            registration.first_name.clone(),
            registration.last_name.clone(),
            registration.role,
        );
        self.seed_account(&registration.password, user.clone());

        let access = self.mint_access();
        let refresh = format!("refresh-{}", Uuid::new_v4());
        {
            let mut state = self.state.lock().unwrap();
            state.access_tokens.insert(access.clone(), user.id);
            state.refresh_tokens.insert(refresh.clone(), user.id);
        }

        Ok(AuthPayload {
            access_token: access,
            refresh_token: refresh,
            user,
        })
    }

    async fn verify_token(&self, access_token: &str) -> Result<(), GatewayError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.check_forced()?;

        let state = self.state.lock().unwrap();
        if state.access_tokens.contains_key(access_token) {
            Ok(())
        } else {
            Err(GatewayError::AuthInvalid)
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<String, GatewayError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.check_forced()?;

        let user_id = {
            let state = self.state.lock().unwrap();
            match state.refresh_tokens.get(refresh_token) {
                Some(id) => *id,
                None => return Err(GatewayError::AuthInvalid),
            }
        };

        let access = self.mint_access();
        self.state
            .lock()
            .unwrap()
            .access_tokens
            .insert(access.clone(), user_id);
        Ok(access)
    }

    async fn fetch_current_user(&self, access_token: &str) -> Result<UserRecord, GatewayError> {
        self.fetch_user_calls.fetch_add(1, Ordering::SeqCst);
        self.check_forced()?;

        let user_id = {
            let state = self.state.lock().unwrap();
            match state.access_tokens.get(access_token) {
                Some(id) => *id,
                None => return Err(GatewayError::AuthInvalid),
            }
        };

        self.user_by_id(user_id).ok_or(GatewayError::AuthInvalid)
    }

    async fn delete_account(&self, access_token: &str) -> Result<(), GatewayError> {
        self.check_forced()?;

        let user_id = {
            let state = self.state.lock().unwrap();
            match state.access_tokens.get(access_token) {
                Some(id) => *id,
                None => return Err(GatewayError::AuthInvalid),
            }
        };

        let mut state = self.state.lock().unwrap();
        state.accounts.retain(|_, (_, u)| u.id != user_id);
        state.access_tokens.retain(|_, id| *id != user_id);
        state.refresh_tokens.retain(|_, id| *id != user_id);
        Ok(())
    }
}
