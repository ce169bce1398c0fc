//! Binary entry point: configuration, logging, wiring, boot.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use th_infra::{FileStore, HttpIdentityGateway, HttpModuleLoader};
use th_shared::config::ShellConfig;
use th_shell::AppShell;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ShellConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.logging.verbose)
        .init();

    info!(environment = %config.environment, "starting TalentHub shell");

    let store = Arc::new(FileStore::new(&config.storage)?);
    let identity = Arc::new(HttpIdentityGateway::new(&config.identity)?);
    let loader = HttpModuleLoader::new(&config.module)?;
    let shell = AppShell::new(identity, store, loader, &config)?;

    // The URL the shell was opened on, carrying any redirect payload
    let current_url = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let report = shell.boot(&current_url).await?;

    info!(
        lifecycle = ?report.lifecycle,
        host = ?report.host,
        redirect = report.redirect_to.as_deref().unwrap_or("-"),
        "shell booted"
    );
    Ok(())
}
