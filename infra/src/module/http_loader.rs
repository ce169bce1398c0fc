//! Loader resolving the deployed module version from its manifest

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use th_core::domain::value_objects::module_props::ModuleProps;
use th_core::errors::ModuleError;
use th_core::events::EventChannel;
use th_core::module::{ModuleLoader, RemoteModule};
use th_shared::config::ModuleConfig;

/// Version manifest published alongside the remote module
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    /// Deployed version identifier
    pub version: String,
    /// Where the module bundle itself lives
    pub entry_url: String,
}

/// Loader fetching the module's version manifest at boot
///
/// The module is deployed and versioned separately from the shell, so
/// the currently live version is only known at runtime.
pub struct HttpModuleLoader {
    client: Client,
    manifest_url: String,
}

impl HttpModuleLoader {
    pub fn new(config: &ModuleConfig) -> Result<Self, ModuleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ModuleError::LoadFailed {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            manifest_url: config.manifest_url.clone(),
        })
    }
}

#[async_trait]
impl ModuleLoader for HttpModuleLoader {
    async fn load(&self) -> Result<Box<dyn RemoteModule>, ModuleError> {
        let response = self
            .client
            .get(&self.manifest_url)
            .send()
            .await
            .map_err(|e| ModuleError::LoadFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ModuleError::LoadFailed {
                message: format!("manifest fetch returned {}", response.status()),
            });
        }

        let manifest: ModuleManifest =
            response.json().await.map_err(|e| ModuleError::LoadFailed {
                message: format!("manifest body: {}", e),
            })?;

        info!(version = %manifest.version, "resolved remote module");
        Ok(Box::new(ManifestModule::new(manifest)))
    }
}

/// The loaded module instance bound to one manifest version
struct ManifestModule {
    manifest: ModuleManifest,
    mounted: AtomicBool,
}

impl ManifestModule {
    fn new(manifest: ModuleManifest) -> Self {
        Self {
            manifest,
            mounted: AtomicBool::new(false),
        }
    }
}

impl RemoteModule for ManifestModule {
    fn mount(&self, props: &ModuleProps, _events: EventChannel) -> Result<(), ModuleError> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return Err(ModuleError::MountFailed {
                message: "module is already mounted".to_string(),
            });
        }
        info!(
            version = %self.manifest.version,
            entry = %self.manifest.entry_url,
            authenticated = props.is_authenticated(),
            "remote module mounted"
        );
        Ok(())
    }

    fn update(&self, props: &ModuleProps) -> Result<(), ModuleError> {
        if !self.mounted.load(Ordering::SeqCst) {
            return Err(ModuleError::MountFailed {
                message: "update before mount".to_string(),
            });
        }
        debug!(authenticated = props.is_authenticated(), "remote module updated");
        Ok(())
    }

    fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}
