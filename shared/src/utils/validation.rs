//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Email format check used by login and registration forms.
///
/// Deliberately permissive: the identity service is the authority; this
/// only catches obvious typos before a round-trip.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile"));

/// Validate an email address format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
