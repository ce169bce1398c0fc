//! Domain entities representing the session and its user.

pub mod session;
pub mod user;

// Re-export commonly used types
pub use session::{LifecycleState, Session};
pub use user::{Plan, UserRecord, UserRole, VisibilityGrant};
