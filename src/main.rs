//! LineKV - An In-Memory Key-Value Store
//!
//! This is the main entry point for the LineKV server.
//! It sets up logging, the storage engine and the listener, then serves
//! connections until Ctrl+C.

use clap::Parser;
use linekv::{Config, Server, StorageEngine};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!("LineKV v{} starting", linekv::VERSION);

    // Create the storage engine (shared across all connections)
    let storage = Arc::new(StorageEngine::new());

    let server = match Server::bind(&config, Arc::clone(&storage)).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Server failed to start");
            return Err(e.into());
        }
    };
    info!("Listening on {}", server.local_addr());

    let stats = Arc::clone(server.stats());

    // Set up graceful shutdown
    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping server..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    server.run_until(shutdown).await;

    let storage_stats = storage.stats();
    info!(
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        commands = stats.commands_processed.load(Ordering::Relaxed),
        keys = storage_stats.keys,
        "Server shutdown complete"
    );
    Ok(())
}
