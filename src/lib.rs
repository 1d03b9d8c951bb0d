pub mod api;
pub mod backfill;
pub mod config;
pub mod db;
pub mod login;
pub mod models;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::db::PatientStore;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Initialize tracing, resolve configuration, and serve the API until
/// Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    // Storage is unusable without a connection string; stop here.
    let config = Config::from_env().inspect_err(|e| tracing::error!("{e}"))?;
    tracing::info!(storage = ?config.storage, "Configuration loaded");

    let store = PatientStore::from_target(&config.storage);

    api::serve(config.bind_addr, store, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
