//! Durable, synchronous persistence for the credential trio.

mod memory;
mod session_store;

pub use memory::MemoryStore;
pub use session_store::SessionStore;
