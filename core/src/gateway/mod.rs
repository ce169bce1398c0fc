//! Collaborator traits for the external identity/session service.

mod identity;
mod mock;

pub use identity::IdentityGateway;
pub use mock::MockIdentityGateway;
