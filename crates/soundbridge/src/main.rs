use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use soundbridge::api;
use soundbridge::platform;
use soundbridge::AccessoryStore;
use soundbridge::Config;
use soundbridge::PlatformContext;

/// Bridge a Vizio SmartCast soundbar into a television accessory
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "soundbridge.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .init();

    tracing::info!("soundbridge starting");
    tracing::info!("Loaded config from: {}", args.config.display());

    let host = Arc::new(AccessoryStore::new());

    // Set up every configured platform
    let ctx = PlatformContext { config: &config };
    for constr in platform::REGISTRY {
        let platform = match constr(&ctx) {
            Ok(Some(p)) => p,
            Err(e) => {
                tracing::error!("failed to create platform: {:#}", e);
                continue;
            }
            Ok(None) => continue,
        };

        tracing::info!("Setting up platform: {}", platform.name());
        if let Err(e) = platform.setup(host.as_ref()).await {
            tracing::error!("[{}] Platform setup failed: {:#}", platform.name(), e);
        }
    }

    if host.accessories().is_empty() {
        tracing::warn!("No accessories published; check the [soundbar] section of the config");
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let server = tokio::spawn(api::serve(
        config.api.listen.clone(),
        config.api.port,
        host.clone(),
        shutdown_rx,
    ));

    tracing::info!("Press Ctrl+C to exit");

    // Wait for Ctrl+C
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received shutdown signal");
        }
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    }

    let _ = shutdown_tx.send(());
    server.await.context("HTTP API task panicked")??;

    tracing::info!("soundbridge shutdown complete");

    Ok(())
}
