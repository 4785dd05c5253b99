//! Sermepa Server
//!
//! Administration backend for the Sermepa (Redsys) payment method
//! configuration.

mod api;
mod config;
mod server;
mod shutdown;
mod state;
mod storage;

use clap::Parser;
use config::{CliOverrides, ConfigLoader};
use sermepa_core::config::ConfigStore;
use sermepa_sdk::gateway::Sermepa;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use storage::{EntityStorage, spawn_persistence_task};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Sermepa Server - Admin backend for the Sermepa payment method
#[derive(Parser, Debug)]
#[command(name = "sermepa-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./sermepa-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Override the path of the stored payment method configuration
    #[arg(long, env = "SERMEPA_STORAGE")]
    storage: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting sermepa-server v{}", env!("CARGO_PKG_VERSION"));

    let overrides = CliOverrides {
        listen: args.listen,
        storage: args.storage,
    };
    let config_loader = Arc::new(ConfigLoader::new(&args.config, overrides));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let storage = EntityStorage::new(&loaded_config.storage_path);
    let entity = storage.load_or_default().map_err(|e| {
        tracing::error!(path = ?storage.path(), "Failed to load stored configuration: {}", e);
        e
    })?;
    tracing::info!(entity = %entity.id, path = ?storage.path(), "Payment method configuration loaded");

    let entity_store = ConfigStore::new(entity);
    let persistence = spawn_persistence_task(&entity_store, storage.clone());

    let state = AppState::new(loaded_config.shared(), entity_store.clone(), Arc::new(Sermepa));

    // Listens for SIGHUP
    let shutdown_notify = spawn_config_reload_handler(
        state.clone(),
        config_loader,
        loaded_config.storage_path.clone(),
    );

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    shutdown_notify.notify_one();

    // The persistence task may be mid-write or behind by one update.
    persistence.abort();
    tracing::info!("Saving payment method configuration...");
    if let Err(e) = storage.persist(entity_store.snapshot().await).await {
        tracing::error!("Failed to save configuration on shutdown: {}", e);
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
