//! Process signals: SIGTERM/SIGINT stop the server, SIGHUP reloads
//! `sermepa-config.toml`.

use crate::config::{ConfigLoader, LoadedConfig};
use crate::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Resolves once SIGTERM or SIGINT arrives.
///
/// Falls back to Ctrl+C if the unix handlers cannot be installed.
pub async fn shutdown_signal() {
    let handlers = signal(SignalKind::terminate())
        .and_then(|sigterm| Ok((sigterm, signal(SignalKind::interrupt())?)));
    let (mut sigterm, mut sigint) = match handlers {
        Ok(handlers) => handlers,
        Err(e) => {
            tracing::error!(error = %e, "Cannot install signal handlers, waiting for Ctrl+C");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            }
            return;
        }
    };

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    tracing::info!(signal = received, "Shutting down gracefully");
}

/// Swap reloaded settings into the running state.
///
/// The listener and the storage file are opened once at startup, so changes
/// to either are reported and otherwise ignored.
pub(crate) async fn apply_reload(state: &AppState, loaded: LoadedConfig, storage_path: &Path) {
    {
        let mut server = state.config.server.write().await;
        if server.listen != loaded.server.listen {
            tracing::warn!(
                current = %server.listen,
                configured = %loaded.server.listen,
                "Listen address change requires a restart"
            );
        }
        *server = loaded.server;
    }
    if loaded.storage_path != *storage_path {
        tracing::warn!(
            current = ?storage_path,
            configured = ?loaded.storage_path,
            "Storage path change requires a restart"
        );
    }
    *state.config.admin.write().await = loaded.admin;
}

/// Reload the configuration on every SIGHUP until the returned [`Notify`]
/// fires.
pub fn spawn_config_reload_handler(
    state: AppState,
    config_loader: Arc<ConfigLoader>,
    storage_path: PathBuf,
) -> Arc<Notify> {
    let stop = Arc::new(Notify::new());
    let stopped = stop.clone();

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(sighup) => sighup,
            Err(e) => {
                tracing::error!(error = %e, "Cannot install SIGHUP handler, reload disabled");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => match config_loader.reload() {
                    Ok(loaded) => {
                        apply_reload(&state, loaded, &storage_path).await;
                        tracing::info!("Configuration reloaded");
                    }
                    Err(e) => tracing::error!(error = %e, "Reload failed, keeping current configuration"),
                },
                _ = stopped.notified() => break,
            }
        }
        tracing::debug!("Reload handler stopped");
    });

    stop
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::{AdminConfig, ServerConfig, SharedConfig};
    use crate::storage::ConfigurationEntity;
    use sermepa_core::config::ConfigStore;
    use sermepa_sdk::gateway::Sermepa;

    fn loaded(listen: &str, secret_hash: &str, storage: &str) -> LoadedConfig {
        LoadedConfig {
            server: ServerConfig {
                listen: listen.parse().unwrap(),
            },
            admin: AdminConfig::new(secret_hash.to_owned()),
            storage_path: PathBuf::from(storage),
        }
    }

    #[tokio::test]
    async fn test_apply_reload_swaps_sections() {
        let initial = loaded("127.0.0.1:8080", "old-hash", "/tmp/a.json");
        let state = AppState::new(
            SharedConfig::new(initial.server, initial.admin),
            ConfigStore::new(ConfigurationEntity::default()),
            Arc::new(Sermepa),
        );

        apply_reload(
            &state,
            loaded("127.0.0.1:9090", "new-hash", "/tmp/b.json"),
            Path::new("/tmp/a.json"),
        )
        .await;

        assert_eq!(state.config.admin.read().await.secret_hash, "new-hash");
        assert_eq!(state.config.server.read().await.listen.port(), 9090);
    }
}
