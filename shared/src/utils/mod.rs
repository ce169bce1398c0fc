//! Common utility functions

pub mod url_sanitize;
pub mod validation;
