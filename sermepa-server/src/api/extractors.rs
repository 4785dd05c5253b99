//! Custom Axum extractors for request authentication.
//!
//! Provides `AdminAuth`, which checks the `Sermepa-Admin-Authorization`
//! header against the argon2 hashed admin secret.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Header carrying the plaintext admin secret.
pub const ADMIN_AUTH_HEADER: &str = "Sermepa-Admin-Authorization";

/// Proof that the request carried the admin secret.
///
/// Add it as a handler argument to protect a route.
pub struct AdminAuth;

/// Errors returned by the [`AdminAuth`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("missing Sermepa-Admin-Authorization header")]
    MissingHeader,
    #[error("invalid Sermepa-Admin-Authorization header")]
    InvalidHeader,
    #[error("admin secret mismatch")]
    Mismatch,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AdminAuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "missing Sermepa-Admin-Authorization header",
            ),
            AdminAuthError::InvalidHeader => (
                StatusCode::BAD_REQUEST,
                "invalid Sermepa-Admin-Authorization header",
            ),
            AdminAuthError::Mismatch => (StatusCode::UNAUTHORIZED, "invalid admin secret"),
        };
        (status, message).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidHeader)?;

        let admin = state.config.admin.read().await;
        if admin.verify_secret(secret) {
            Ok(AdminAuth)
        } else {
            tracing::warn!("Rejected admin request with wrong secret");
            Err(AdminAuthError::Mismatch)
        }
    }
}
