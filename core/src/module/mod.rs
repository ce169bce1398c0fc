//! Remote module boundary: the contract between the shell and the
//! independently deployed UI module, and the host that isolates its
//! failures.

mod contract;
mod host;
mod stub;

pub use contract::{ModuleLoader, RemoteModule};
pub use host::{HostState, ModuleHost};
pub use stub::{StubModule, StubModuleLoader};
