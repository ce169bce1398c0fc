//! Main session service implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use validator::Validate;

use th_shared::utils::{url_sanitize, validation};

use crate::domain::entities::session::{LifecycleState, Session};
use crate::domain::entities::user::{Plan, UserRecord, UserRole};
use crate::domain::value_objects::auth_payload::AuthPayload;
use crate::domain::value_objects::module_props::ModuleProps;
use crate::domain::value_objects::registration::NewRegistration;
use crate::errors::{AuthError, DomainError, DomainResult, GatewayError};
use crate::gateway::IdentityGateway;
use crate::store::SessionStore;

/// Result of a verification-on-mount pass
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// No access token in storage; nothing to verify
    NoCredentials,
    /// The guard absorbed a duplicate invocation; no round-trip made
    AlreadyChecked,
    /// The server confirmed the stored access token
    Confirmed,
    /// The access token was rejected but silent renewal succeeded
    Refreshed,
    /// Availability failure; the session was left untouched and the
    /// next natural trigger retries
    Unavailable,
    /// Renewal failed; the session is terminally expired
    Expired { prior_role: Option<UserRole> },
}

/// Result of a silent refresh attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A new access token was stored; refresh token and user unchanged
    Renewed,
    /// The refresh token was rejected or absent; all credentials cleared
    Expired { prior_role: Option<UserRole> },
}

/// What an OAuth-style redirect carried
#[derive(Debug, Clone, PartialEq)]
pub enum OAuthOutcome {
    /// Trio consumed, session authenticated
    Completed,
    /// Error-carrying or malformed payload; session reset to anonymous
    Rejected(AuthError),
    /// The URL carried no sign-in payload at all
    Absent,
}

/// Outcome of consuming a redirect URL, plus the path-only URL the
/// caller must install so the redirect cannot replay
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectConsumption {
    pub outcome: OAuthOutcome,
    pub sanitized_url: String,
}

/// Service owning the session lifecycle state machine
///
/// The session is mutated only here. Every persistence write goes
/// through the store's whole-trio operations, so no path can leave one
/// stored key stale while another updates.
pub struct SessionService<I: IdentityGateway, S: SessionStore> {
    identity: Arc<I>,
    store: Arc<S>,
    session: Mutex<Session>,
    /// Re-entrancy guard for verification, not a lock: repeated mounts
    /// must not trigger duplicate verification for the same instance
    verify_guard: AtomicBool,
}

impl<I: IdentityGateway, S: SessionStore> SessionService<I, S> {
    /// Create the service, hydrating the session from storage
    ///
    /// Tokens found in storage start the session in `Verifying`; the
    /// caller is expected to run [`Self::verify_on_mount`] next.
    pub fn new(identity: Arc<I>, store: Arc<S>) -> DomainResult<Self> {
        let persisted = store.load()?;
        let session = Session::from_persisted(persisted);
        info!(lifecycle = ?session.lifecycle, "session hydrated from storage");
        Ok(Self {
            identity,
            store,
            session: Mutex::new(session),
            verify_guard: AtomicBool::new(false),
        })
    }

    /// Authenticate with email and password
    ///
    /// On success the trio is persisted atomically and the session
    /// becomes `Authenticated`. On failure nothing stored changes and a
    /// recoverable error is surfaced for the originating form.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<UserRecord> {
        if !validation::is_valid_email(email) {
            return Err(DomainError::Validation {
                message: "invalid email address".to_string(),
            });
        }
        if password.is_empty() {
            return Err(DomainError::Validation {
                message: "password is required".to_string(),
            });
        }

        let payload = self
            .identity
            .login(email, password)
            .await
            .map_err(|e| match e {
                GatewayError::AuthInvalid => DomainError::Auth(AuthError::InvalidCredentials),
                other => DomainError::Gateway(other),
            })?;

        info!(role = %payload.user.role, "login succeeded");
        self.install_payload(payload)
    }

    /// Create a new account and sign it in
    ///
    /// Same persistence contract as `login`; new users start on the
    /// free tier with no visibility grant.
    pub async fn register(&self, registration: &NewRegistration) -> DomainResult<UserRecord> {
        registration
            .validate()
            .map_err(|e| DomainError::Validation {
                message: e.to_string(),
            })?;

        let payload = self
            .identity
            .register(registration)
            .await
            .map_err(|e| match e {
                GatewayError::Conflict { .. } => {
                    DomainError::Auth(AuthError::EmailAlreadyRegistered)
                }
                GatewayError::Validation { message } => DomainError::Validation { message },
                other => DomainError::Gateway(other),
            })?;

        info!(role = %payload.user.role, "registration succeeded");
        self.install_payload(payload)
    }

    /// Consume an OAuth-style redirect URL carrying `token`, `refresh`,
    /// and a URL-encoded `user` record, or an `error` parameter
    ///
    /// A well-formed payload applies the exact same persistence
    /// invariant as login. Malformed and error-carrying input both reset
    /// the in-memory session to anonymous. The returned sanitized URL
    /// must replace the current one immediately so reload cannot
    /// re-consume the parameters.
    pub fn hydrate_from_oauth_redirect(
        &self,
        current_url: &str,
    ) -> DomainResult<RedirectConsumption> {
        let params = url_sanitize::query_params(current_url);
        let sanitized_url = url_sanitize::path_only(current_url);

        if let Some(message) = params.get("error") {
            warn!(%message, "sign-in provider returned an error");
            self.session.lock().expect("session poisoned").reset();
            return Ok(RedirectConsumption {
                outcome: OAuthOutcome::Rejected(AuthError::ProviderRejected {
                    message: message.clone(),
                }),
                sanitized_url,
            });
        }

        let carries_payload = params.contains_key("token")
            || params.contains_key("refresh")
            || params.contains_key("user");
        if !carries_payload {
            return Ok(RedirectConsumption {
                outcome: OAuthOutcome::Absent,
                sanitized_url,
            });
        }

        let payload = params
            .get("token")
            .zip(params.get("refresh"))
            .zip(params.get("user"))
            .and_then(|((token, refresh), user_json)| {
                serde_json::from_str::<UserRecord>(user_json)
                    .ok()
                    .map(|user| AuthPayload {
                        access_token: token.clone(),
                        refresh_token: refresh.clone(),
                        user,
                    })
            });

        match payload {
            Some(payload) => {
                self.install_payload(payload)?;
                Ok(RedirectConsumption {
                    outcome: OAuthOutcome::Completed,
                    sanitized_url,
                })
            }
            None => {
                warn!("sign-in redirect payload was malformed");
                self.session.lock().expect("session poisoned").reset();
                Ok(RedirectConsumption {
                    outcome: OAuthOutcome::Rejected(AuthError::MalformedRedirect),
                    sanitized_url,
                })
            }
        }
    }

    /// Confirm stored credentials with at most one server round-trip
    /// per service instance
    ///
    /// Only an authentication-class rejection starts the refresh path;
    /// availability failures leave the session bit-for-bit unchanged and
    /// re-arm the guard so the next natural trigger retries.
    pub async fn verify_on_mount(&self) -> DomainResult<VerifyOutcome> {
        if self.verify_guard.swap(true, Ordering::SeqCst) {
            return Ok(VerifyOutcome::AlreadyChecked);
        }

        let access_token = {
            let session = self.session.lock().expect("session poisoned");
            session.access_token.clone()
        };
        let Some(access_token) = access_token else {
            self.verify_guard.store(false, Ordering::SeqCst);
            return Ok(VerifyOutcome::NoCredentials);
        };

        match self.identity.verify_token(&access_token).await {
            Ok(()) => {
                let mut session = self.session.lock().expect("session poisoned");
                session.lifecycle = LifecycleState::Authenticated;
                debug_assert!(session.invariant_holds());
                debug!("stored access token confirmed");
                Ok(VerifyOutcome::Confirmed)
            }
            Err(e) if e.is_auth_invalid() => {
                debug!("stored access token rejected, attempting silent refresh");
                match self.refresh().await? {
                    RefreshOutcome::Renewed => Ok(VerifyOutcome::Refreshed),
                    RefreshOutcome::Expired { prior_role } => {
                        Ok(VerifyOutcome::Expired { prior_role })
                    }
                }
            }
            Err(e) => {
                // Availability failure: never force a logout. Re-arm the
                // guard so the next mount retries.
                warn!(error = %e, "verification unavailable, leaving session untouched");
                self.verify_guard.store(false, Ordering::SeqCst);
                Ok(VerifyOutcome::Unavailable)
            }
        }
    }

    /// Mint a new access token from the stored refresh token
    ///
    /// Success replaces the access token only; refresh token and user
    /// record are untouched. Any failure is terminal for the session:
    /// all three stored fields are cleared and the prior role is kept
    /// for redirect targeting.
    pub async fn refresh(&self) -> DomainResult<RefreshOutcome> {
        let refresh_token = {
            let mut session = self.session.lock().expect("session poisoned");
            match session.refresh_token.clone() {
                Some(token) => {
                    session.lifecycle = LifecycleState::Refreshing;
                    Some(token)
                }
                None => None,
            }
        };

        let Some(refresh_token) = refresh_token else {
            return self.expire_session();
        };

        match self.identity.refresh_token(&refresh_token).await {
            Ok(new_access) => {
                let persisted = {
                    let session = self.session.lock().expect("session poisoned");
                    let mut persisted = session.to_persisted();
                    persisted.access_token = Some(new_access.clone());
                    persisted
                };
                self.store.persist(&persisted)?;

                let mut session = self.session.lock().expect("session poisoned");
                session.access_token = Some(new_access);
                session.lifecycle = LifecycleState::Authenticated;
                debug_assert!(session.invariant_holds());
                info!("access token silently renewed");
                Ok(RefreshOutcome::Renewed)
            }
            Err(e) => {
                warn!(error = %e, "silent refresh failed, expiring session");
                self.expire_session()
            }
        }
    }

    /// Re-fetch the user record after an out-of-band change (such as a
    /// completed purchase) and replace the cached record wholesale
    pub async fn refresh_user_record(&self) -> DomainResult<UserRecord> {
        let access_token = {
            let session = self.session.lock().expect("session poisoned");
            session.access_token.clone()
        }
        .ok_or(DomainError::Unauthorized)?;

        let user = self.identity.fetch_current_user(&access_token).await?;

        let persisted = {
            let session = self.session.lock().expect("session poisoned");
            let mut persisted = session.to_persisted();
            persisted.user = Some(user.clone());
            persisted
        };
        self.store.persist(&persisted)?;

        let mut session = self.session.lock().expect("session poisoned");
        session.user = Some(user.clone());
        debug!("user record replaced from server");
        Ok(user)
    }

    /// In-place update confined to the plan field, persisted
    pub fn update_plan(&self, plan: Plan) -> DomainResult<()> {
        let mut session = self.session.lock().expect("session poisoned");
        let user = session.user.as_mut().ok_or(DomainError::Unauthorized)?;
        user.set_plan(plan);
        let persisted = session.to_persisted();
        self.store.persist(&persisted)?;
        Ok(())
    }

    /// Unconditional clear of all credentials
    pub fn sign_out(&self) -> DomainResult<()> {
        self.store.clear()?;
        self.session.lock().expect("session poisoned").reset();
        self.verify_guard.store(false, Ordering::SeqCst);
        info!("signed out");
        Ok(())
    }

    /// Delete the account server-side, then clear local state
    pub async fn delete_account(&self) -> DomainResult<()> {
        let access_token = {
            let session = self.session.lock().expect("session poisoned");
            session.access_token.clone()
        }
        .ok_or(DomainError::Unauthorized)?;

        self.identity.delete_account(&access_token).await?;
        self.sign_out()
    }

    /// Finish the `Expired` to `Anonymous` transition, returning the prior
    /// role so the caller can redirect to the matching entry point
    pub fn acknowledge_expiry(&self) -> Option<UserRole> {
        let mut session = self.session.lock().expect("session poisoned");
        if let LifecycleState::Expired { prior_role } = session.lifecycle {
            session.reset();
            prior_role
        } else {
            None
        }
    }

    /// A clone of the current session
    pub fn snapshot(&self) -> Session {
        self.session.lock().expect("session poisoned").clone()
    }

    /// The current lifecycle state
    pub fn lifecycle(&self) -> LifecycleState {
        self.session.lock().expect("session poisoned").lifecycle.clone()
    }

    /// The read-only snapshot handed to the remote module
    pub fn module_props(&self) -> ModuleProps {
        self.session.lock().expect("session poisoned").module_props()
    }

    /// Persist the trio and commit the authenticated session. Storage is
    /// written first so a persistence failure leaves the in-memory
    /// session unchanged.
    fn install_payload(&self, payload: AuthPayload) -> DomainResult<UserRecord> {
        self.store.persist(&payload.to_persisted())?;
        let user = payload.user.clone();
        let mut session = self.session.lock().expect("session poisoned");
        *session = Session::authenticated(payload);
        debug_assert!(session.invariant_holds());
        Ok(user)
    }

    fn expire_session(&self) -> DomainResult<RefreshOutcome> {
        self.store.clear()?;
        let mut session = self.session.lock().expect("session poisoned");
        let prior_role = session.expire();
        debug_assert!(session.invariant_holds());
        Ok(RefreshOutcome::Expired { prior_role })
    }
}
