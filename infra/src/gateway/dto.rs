//! Wire types for the identity service endpoints.

use serde::{Deserialize, Serialize};

use th_core::domain::entities::user::{UserRecord, UserRole};
use th_core::domain::value_objects::auth_payload::AuthPayload;
use th_core::domain::value_objects::registration::NewRegistration;

/// Body of `POST /auth/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: UserRole,
}

impl<'a> From<&'a NewRegistration> for RegisterRequest<'a> {
    fn from(registration: &'a NewRegistration) -> Self {
        Self {
            email: &registration.email,
            password: &registration.password,
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            role: registration.role,
        }
    }
}

/// Successful response of login and register
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserRecord,
}

impl From<AuthResponse> for AuthPayload {
    fn from(response: AuthResponse) -> Self {
        AuthPayload {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user,
        }
    }
}

/// Body of `POST /auth/refresh`
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Successful response of `POST /auth/refresh`
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Error body shape shared by all endpoints
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
}
