//! Router assembly and the HTTP listener.

use crate::api::admin;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/admin", admin::router())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Number of configuration updates applied since startup.
    configuration_version: u64,
    /// Whether the payment method is enabled and every merchant setting is
    /// present.
    ready: bool,
}

/// Liveness plus a summary of the stored configuration. Carries no secrets,
/// so it needs no admin auth.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = {
        let entity = state.entity.read().await;
        entity.status && entity.configuration.merchant().is_complete()
    };
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        configuration_version: state.entity.version(),
        ready,
    })
}

pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Admin server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
