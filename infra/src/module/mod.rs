//! Remote module loading over HTTP.

mod http_loader;

pub use http_loader::{HttpModuleLoader, ModuleManifest};
