//! The value contract between shell and hosted module.

use async_trait::async_trait;

use crate::domain::value_objects::module_props::ModuleProps;
use crate::errors::ModuleError;
use crate::events::EventChannel;

/// An independently built and deployed UI unit hosted by the shell
///
/// The module receives a read-only props snapshot and a handle to the
/// event channel; it never receives the session service, so any session
/// mutation it wants must be requested over the channel.
pub trait RemoteModule: Send + Sync {
    /// Mount the module with an initial snapshot
    fn mount(&self, props: &ModuleProps, events: EventChannel) -> Result<(), ModuleError>;

    /// Hand the module a fresh snapshot after a session change
    fn update(&self, props: &ModuleProps) -> Result<(), ModuleError>;

    /// Tear the module down
    fn unmount(&self);
}

/// Loads the remote module at runtime rather than at build time
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Resolve and instantiate the currently deployed module version
    async fn load(&self) -> Result<Box<dyn RemoteModule>, ModuleError>;
}
