use axum::{Json, extract::State, response::IntoResponse};
use sermepa_core::PLUGIN_DEFINITION;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::ConfigurationResponse;

/// `GET /configuration`: show the configuration entity and a snapshot of
/// its merchant settings.
pub async fn show_configuration(
    state: State<AppState>,
    _auth: AdminAuth,
) -> impl IntoResponse {
    let entity = state.entity.read().await;
    tracing::debug!(entity = %entity.id, "Showing payment method configuration");
    Json(ConfigurationResponse::from_entity(&entity, PLUGIN_DEFINITION))
}
