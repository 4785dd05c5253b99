use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sermepa_core::PLUGIN_DEFINITION;
use sermepa_core::form::FormContext;
use sermepa_sdk::objects::ConfigurationForm;
use serde_json::Value;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;
use crate::storage::ConfigurationEntity;

use super::{AdminApiError, ConfigurationResponse, PLUGIN_FORM_PARENTS};

fn build_form(state: &AppState, entity: &ConfigurationEntity) -> ConfigurationForm {
    let ctx = FormContext::new(&*state.catalog)
        .mounted_at(PLUGIN_FORM_PARENTS.iter().map(|p| p.to_string()).collect());
    entity.configuration.build_configuration_form(&ctx)
}

/// `GET /configuration/form`: describe the configuration form with the
/// current values as defaults.
pub async fn show_form(state: State<AppState>, _auth: AdminAuth) -> impl IntoResponse {
    let entity = state.entity.read().await;
    Json(build_form(&state, &entity))
}

/// `POST /configuration/form`: validate and apply a submitted value tree.
///
/// Responds `422` with the list of offending fields when validation fails;
/// otherwise applies the values and returns the updated configuration.
pub async fn submit_form(
    state: State<AppState>,
    _auth: AdminAuth,
    Json(values): Json<Value>,
) -> Result<impl IntoResponse, AdminApiError> {
    let (form, errors) = {
        let entity = state.entity.read().await;
        let form = build_form(&state, &entity);
        let errors = entity
            .configuration
            .validate_configuration_form(&form, &values);
        (form, errors)
    };
    if !errors.is_empty() {
        tracing::warn!(count = errors.len(), "Rejected configuration submission");
        return Err(AdminApiError::Validation(errors));
    }

    let response = state
        .entity
        .try_modify(|entity| {
            entity
                .configuration
                .submit_configuration_form(&form, &values)?;
            Ok::<_, AdminApiError>(ConfigurationResponse::from_entity(entity, PLUGIN_DEFINITION))
        })
        .await?;

    tracing::info!(entity = %response.id, "Payment method configuration updated");
    Ok((StatusCode::OK, Json(response)))
}
