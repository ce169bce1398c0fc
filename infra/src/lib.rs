//! # TalentHub Infrastructure
//!
//! Concrete implementations of the core collaborator traits: the HTTP
//! identity gateway, the filesystem-backed session store, and the
//! remote module manifest loader.

pub mod gateway;
pub mod module;
pub mod storage;

// Re-export commonly used types
pub use gateway::HttpIdentityGateway;
pub use module::HttpModuleLoader;
pub use storage::FileStore;
