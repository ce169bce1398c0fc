//! # TalentHub Core
//!
//! Core orchestration logic for the TalentHub shell. This crate contains
//! the session lifecycle state machine, the typed cross-module event
//! channel, the modal sequencer, the remote module boundary contract,
//! and the collaborator traits (identity gateway, session store) that
//! the infrastructure layer implements.

pub mod domain;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod module;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use events::*;
pub use gateway::*;
pub use module::*;
pub use services::*;
pub use store::*;
