//! Module host: the failure-isolation boundary around the remote module.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::domain::value_objects::module_props::ModuleProps;
use crate::errors::ModuleError;
use crate::events::EventChannel;

use super::contract::{ModuleLoader, RemoteModule};

/// Presentation state of the hosted module
#[derive(Debug, Clone, PartialEq)]
pub enum HostState {
    /// Load in flight; the shell shows a loading placeholder. Single
    /// suspension point, no timeout.
    Loading,
    /// Module mounted and rendering
    Ready,
    /// Load or mount failed; rendered as a recoverable error panel with
    /// a manual retry
    Failed { message: String },
}

/// Hosts the remote module and contains every failure at the boundary
///
/// A load or mount failure becomes [`HostState::Failed`]; it is never
/// propagated to crash the shell. `retry` performs a full reload.
pub struct ModuleHost<L: ModuleLoader> {
    loader: L,
    channel: EventChannel,
    state: Mutex<HostState>,
    module: Mutex<Option<Box<dyn RemoteModule>>>,
}

impl<L: ModuleLoader> ModuleHost<L> {
    /// Create a host; the module is not loaded until `boot`
    pub fn new(loader: L, channel: EventChannel) -> Self {
        Self {
            loader,
            channel,
            state: Mutex::new(HostState::Loading),
            module: Mutex::new(None),
        }
    }

    /// Load and mount the module with the given snapshot
    ///
    /// Returns the resulting state; all errors (including mount panics)
    /// are converted into `Failed`.
    pub async fn boot(&self, props: &ModuleProps) -> HostState {
        *self.state.lock().expect("host state poisoned") = HostState::Loading;

        let module = match self.loader.load().await {
            Ok(module) => module,
            Err(error) => {
                warn!(%error, "remote module load failed");
                return self.fail(error);
            }
        };

        let mount_result = catch_unwind(AssertUnwindSafe(|| {
            module.mount(props, self.channel.clone())
        }));

        match mount_result {
            Ok(Ok(())) => {
                *self.module.lock().expect("host module poisoned") = Some(module);
                *self.state.lock().expect("host state poisoned") = HostState::Ready;
                info!("remote module mounted");
                HostState::Ready
            }
            Ok(Err(error)) => {
                warn!(%error, "remote module mount failed");
                self.fail(error)
            }
            Err(_) => {
                warn!("remote module panicked during mount");
                self.fail(ModuleError::Panicked)
            }
        }
    }

    /// Hand the mounted module a fresh snapshot after a session change
    ///
    /// A failure during update demotes the host to `Failed` rather than
    /// propagating.
    pub fn update(&self, props: &ModuleProps) {
        let module = self.module.lock().expect("host module poisoned");
        let Some(module) = module.as_ref() else {
            return;
        };

        let result = catch_unwind(AssertUnwindSafe(|| module.update(props)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                warn!(%error, "remote module update failed");
                drop(module);
                self.fail(error);
            }
            Err(_) => {
                warn!("remote module panicked during update");
                drop(module);
                self.fail(ModuleError::Panicked);
            }
        }
    }

    /// Manual retry from the error panel: full reload
    pub async fn retry(&self, props: &ModuleProps) -> HostState {
        self.unmount();
        self.boot(props).await
    }

    /// Unmount and drop the module
    pub fn unmount(&self) {
        if let Some(module) = self.module.lock().expect("host module poisoned").take() {
            let _ = catch_unwind(AssertUnwindSafe(|| module.unmount()));
        }
        *self.state.lock().expect("host state poisoned") = HostState::Loading;
    }

    /// Current presentation state
    pub fn status(&self) -> HostState {
        self.state.lock().expect("host state poisoned").clone()
    }

    fn fail(&self, error: ModuleError) -> HostState {
        let failed = HostState::Failed {
            message: error.to_string(),
        };
        *self.module.lock().expect("host module poisoned") = None;
        *self.state.lock().expect("host state poisoned") = failed.clone();
        failed
    }
}
