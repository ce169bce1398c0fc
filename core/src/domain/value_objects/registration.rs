//! Registration input with field-level validation.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::user::UserRole;

/// Input for creating a new account
///
/// Validated at the client edge before any round-trip; the identity
/// service remains the authority and may still reject.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRegistration {
    /// Account email address
    #[validate(email(message = "invalid email address"))]
    pub email: String,

    /// Plain-text password, sent only to the identity service
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,

    /// Given name
    #[validate(length(min = 1, max = 63, message = "first name is required"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, max = 63, message = "last name is required"))]
    pub last_name: String,

    /// Chosen marketplace role
    pub role: UserRole,
}
