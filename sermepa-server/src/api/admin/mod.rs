//! Admin API handlers.
//!
//! These endpoints are called by the admin dashboard frontend and require
//! the `Sermepa-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `GET  /configuration`      – show the configuration and its merchant settings
//! - `GET  /configuration/form` – describe the configuration form
//! - `POST /configuration/form` – validate and apply submitted form values

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use sermepa_core::PluginDefinition;
use sermepa_core::config::DerivativeConfiguration;
use sermepa_core::form::{SubmitError, ValidationError};
use serde::Serialize;

use crate::state::AppState;
use crate::storage::ConfigurationEntity;

mod configuration_form;
mod show_configuration;

/// Where the plugin's elements sit in submitted form values.
pub(crate) const PLUGIN_FORM_PARENTS: [&str; 1] = ["plugin_form"];

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/configuration",
            get(show_configuration::show_configuration),
        )
        .route(
            "/configuration/form",
            get(configuration_form::show_form).post(configuration_form::submit_form),
        )
}

// ---------------------------------------------------------------------------
// Shared response and error types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ConfigurationResponse {
    pub id: String,
    pub label: String,
    pub status: bool,
    pub plugin: PluginDefinition,
    pub configuration: DerivativeConfiguration,
}

impl ConfigurationResponse {
    pub(crate) fn from_entity(entity: &ConfigurationEntity, plugin: PluginDefinition) -> Self {
        Self {
            id: entity.id.clone(),
            label: entity.label.clone(),
            status: entity.status,
            plugin,
            configuration: entity.configuration.derivative_configuration(),
        }
    }
}

#[derive(Serialize)]
struct ValidationErrorsBody {
    errors: Vec<ValidationError>,
}

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    /// Submitted values violate the form's constraints.
    Validation(Vec<ValidationError>),
    /// Submitted values do not match the form's structure.
    Submit(SubmitError),
}

impl From<SubmitError> for AdminApiError {
    fn from(err: SubmitError) -> Self {
        AdminApiError::Submit(err)
    }
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorsBody { errors }),
            )
                .into_response(),
            AdminApiError::Submit(e) => {
                tracing::warn!(error = %e, "Admin API: malformed submission");
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extractors::ADMIN_AUTH_HEADER;
    use crate::config::runtime::{AdminConfig, ServerConfig, SharedConfig};
    use crate::server::build_router;
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };
    use axum::body::Body;
    use axum::http::{Method, Request};
    use sermepa_core::config::ConfigStore;
    use sermepa_sdk::gateway::Sermepa;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "admin-secret";

    fn test_state() -> AppState {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(SECRET.as_bytes(), &salt)
            .unwrap()
            .to_string();
        let config = SharedConfig::new(
            ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
            },
            AdminConfig::new(hash),
        );
        AppState::new(
            config,
            ConfigStore::new(ConfigurationEntity::default()),
            Arc::new(Sermepa),
        )
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(ADMIN_AUTH_HEADER, SECRET);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = build_router(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn valid_submission() -> Value {
        json!({
            "plugin_form": {
                "brand_label": "Card",
                "message_text": "",
                "execute_status_id": "payment_pending",
                "sermepa": {
                    "environment": "test",
                    "merchant_name": "ACME",
                    "merchant_code": "123456",
                    "merchant_terminal": "001",
                    "merchant_currency": "978",
                    "merchant_payment_method": "C",
                    "encryption_key": "secret",
                },
            },
        })
    }

    #[tokio::test]
    async fn test_missing_or_wrong_secret_is_rejected() {
        let state = test_state();
        let router = build_router(state);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/configuration")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/admin/configuration")
                    .header(ADMIN_AUTH_HEADER, "wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_show_form() {
        let state = test_state();
        let (status, form) = send(&state, Method::GET, "/admin/configuration/form", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(form["parents"], json!(["plugin_form"]));

        let elements = form["elements"].as_array().unwrap();
        let fieldset = elements.iter().find(|e| e["key"] == "sermepa").unwrap();
        assert_eq!(fieldset["type"], "fieldset");
        assert_eq!(fieldset["parents"], json!(["plugin_form", "sermepa"]));
        assert_eq!(fieldset["children"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_submit_updates_configuration() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/admin/configuration/form",
            Some(valid_submission()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configuration"]["merchant_code"], "123456");
        assert_eq!(body["plugin"]["id"], "sermepa_payment");

        let entity = state.entity.snapshot().await;
        assert_eq!(entity.configuration.merchant().encryption_key(), "secret");
        assert_eq!(state.entity.version(), 1);

        let (status, shown) = send(&state, Method::GET, "/admin/configuration", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shown["configuration"]["merchant_name"], "ACME");
    }

    #[tokio::test]
    async fn test_invalid_submission_is_unprocessable() {
        let state = test_state();
        let mut values = valid_submission();
        values["plugin_form"]["sermepa"]["merchant_terminal"] = json!("12345");
        values["plugin_form"]["sermepa"]["encryption_key"] = json!("");

        let (status, body) =
            send(&state, Method::POST, "/admin/configuration/form", Some(values)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "plugin_form.sermepa.merchant_terminal");
        assert_eq!(errors[0]["kind"], "too_long");
        assert_eq!(errors[1]["kind"], "required");

        assert_eq!(state.entity.version(), 0);
    }

    #[tokio::test]
    async fn test_misshapen_submission_fails_validation() {
        let state = test_state();
        let mut values = valid_submission();
        values["plugin_form"]["brand_label"] = json!(["not", "a", "string"]);

        let (status, _) =
            send(&state, Method::POST, "/admin/configuration/form", Some(values)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &state,
            Method::POST,
            "/admin/configuration/form",
            Some(json!({ "plugin_form": "flat" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.entity.version(), 0);
    }

    #[tokio::test]
    async fn test_null_field_is_accepted() {
        let state = test_state();
        let mut values = valid_submission();
        values["plugin_form"]["message_text"] = Value::Null;

        let (status, _) =
            send(&state, Method::POST, "/admin/configuration/form", Some(values)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.entity.version(), 1);
    }

    #[tokio::test]
    async fn test_submit_error_is_bad_request() {
        let response =
            AdminApiError::from(SubmitError::MissingValues("plugin_form".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"no submitted values at `plugin_form`");
    }

    #[tokio::test]
    async fn test_health_reports_readiness() {
        let state = test_state();
        let response = build_router(state.clone())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_, health) = send(&state, Method::GET, "/health", None).await;
        assert_eq!(health["ready"], false);
        assert_eq!(health["configuration_version"], 0);

        send(
            &state,
            Method::POST,
            "/admin/configuration/form",
            Some(valid_submission()),
        )
        .await;
        let (_, health) = send(&state, Method::GET, "/health", None).await;
        assert_eq!(health["ready"], true);
        assert_eq!(health["configuration_version"], 1);
    }
}
