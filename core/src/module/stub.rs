//! Stub module and loader for exercising the boundary contract.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::value_objects::module_props::ModuleProps;
use crate::errors::ModuleError;
use crate::events::EventChannel;

use super::contract::{ModuleLoader, RemoteModule};

#[derive(Default)]
struct StubInner {
    mount_count: AtomicUsize,
    unmounted: AtomicBool,
    panic_on_mount: AtomicBool,
    last_props: Mutex<Option<ModuleProps>>,
    last_update: Mutex<Option<ModuleProps>>,
    channel: Mutex<Option<EventChannel>>,
}

/// Recording stub implementation of [`RemoteModule`]
///
/// Clones share state so tests can keep a handle after giving the
/// module to the host.
#[derive(Clone, Default)]
pub struct StubModule {
    inner: Arc<StubInner>,
}

impl StubModule {
    /// A well-behaved stub
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that panics when mounted
    pub fn panicking_on_mount() -> Self {
        let stub = Self::default();
        stub.inner.panic_on_mount.store(true, Ordering::SeqCst);
        stub
    }

    /// How many times `mount` ran
    pub fn mount_count(&self) -> usize {
        self.inner.mount_count.load(Ordering::SeqCst)
    }

    /// Whether `unmount` ran
    pub fn was_unmounted(&self) -> bool {
        self.inner.unmounted.load(Ordering::SeqCst)
    }

    /// The props passed at mount
    pub fn mounted_props(&self) -> Option<ModuleProps> {
        self.inner.last_props.lock().unwrap().clone()
    }

    /// The props passed at the latest update
    pub fn last_update(&self) -> Option<ModuleProps> {
        self.inner.last_update.lock().unwrap().clone()
    }

    /// The event channel handed over at mount, for publishing
    /// module-to-shell messages from tests
    pub fn channel(&self) -> Option<EventChannel> {
        self.inner.channel.lock().unwrap().clone()
    }
}

impl RemoteModule for StubModule {
    fn mount(&self, props: &ModuleProps, events: EventChannel) -> Result<(), ModuleError> {
        if self.inner.panic_on_mount.load(Ordering::SeqCst) {
            panic!("stub module asked to panic");
        }
        self.inner.mount_count.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_props.lock().unwrap() = Some(props.clone());
        *self.inner.channel.lock().unwrap() = Some(events);
        Ok(())
    }

    fn update(&self, props: &ModuleProps) -> Result<(), ModuleError> {
        *self.inner.last_update.lock().unwrap() = Some(props.clone());
        Ok(())
    }

    fn unmount(&self) {
        self.inner.unmounted.store(true, Ordering::SeqCst);
    }
}

enum LoaderScript {
    Succeed(StubModule),
    Fail(String),
    FailOnceThen(StubModule),
}

/// Scripted loader returning a stub module or a load failure
pub struct StubModuleLoader {
    script: Mutex<LoaderScript>,
}

impl StubModuleLoader {
    /// Loader that always returns the given stub
    pub fn succeeding(module: StubModule) -> Self {
        Self {
            script: Mutex::new(LoaderScript::Succeed(module)),
        }
    }

    /// Loader that always fails
    pub fn failing(message: &str) -> Self {
        Self {
            script: Mutex::new(LoaderScript::Fail(message.to_string())),
        }
    }

    /// Loader that fails the first load and succeeds afterwards
    pub fn failing_once_then(module: StubModule) -> Self {
        Self {
            script: Mutex::new(LoaderScript::FailOnceThen(module)),
        }
    }
}

#[async_trait]
impl ModuleLoader for StubModuleLoader {
    async fn load(&self) -> Result<Box<dyn RemoteModule>, ModuleError> {
        let mut script = self.script.lock().unwrap();
        match &*script {
            LoaderScript::Succeed(module) => Ok(Box::new(module.clone())),
            LoaderScript::Fail(message) => Err(ModuleError::LoadFailed {
                message: message.clone(),
            }),
            LoaderScript::FailOnceThen(module) => {
                let module = module.clone();
                *script = LoaderScript::Succeed(module.clone());
                Err(ModuleError::LoadFailed {
                    message: "first load fails".to_string(),
                })
            }
        }
    }
}
