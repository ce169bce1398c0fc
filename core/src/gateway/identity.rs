//! Identity gateway trait defining the consumed server contract.

use async_trait::async_trait;

use crate::domain::entities::user::UserRecord;
use crate::domain::value_objects::auth_payload::AuthPayload;
use crate::domain::value_objects::registration::NewRegistration;
use crate::errors::GatewayError;

/// Abstract contract over the identity/session server endpoints the
/// shell consumes.
///
/// Every method must return a distinguishable authentication-invalid
/// status ([`GatewayError::AuthInvalid`]) separate from availability
/// failures, since the session retry/expiry policy depends on that
/// distinction.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Exchange credentials for the token/refresh/user trio
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, GatewayError>;

    /// Create a new account; the returned user starts on the free tier
    /// with no visibility grant
    async fn register(&self, registration: &NewRegistration) -> Result<AuthPayload, GatewayError>;

    /// Confirm that an access token is still valid
    async fn verify_token(&self, access_token: &str) -> Result<(), GatewayError>;

    /// Mint a new access token from a refresh token
    async fn refresh_token(&self, refresh_token: &str) -> Result<String, GatewayError>;

    /// Re-fetch the current user record
    async fn fetch_current_user(&self, access_token: &str) -> Result<UserRecord, GatewayError>;

    /// Delete the authenticated account
    async fn delete_account(&self, access_token: &str) -> Result<(), GatewayError>;
}
