//! Value objects representing immutable domain concepts.

pub mod auth_payload;
pub mod module_props;
pub mod registration;

// Re-export commonly used types
pub use auth_payload::{AuthPayload, PersistedSession};
pub use module_props::ModuleProps;
pub use registration::NewRegistration;
