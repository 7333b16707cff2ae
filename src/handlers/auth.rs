use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::errors::AppError;
use crate::models::Caller;
use crate::services::tokens;
use crate::state::AppState;

/// No `Authorization` header means an anonymous caller. A header that is
/// present but not a valid bearer token is rejected outright rather than
/// downgraded to guest.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller::Anonymous);
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::InvalidCredentials)?;

        match tokens::verify(&state.config.token_secret, token) {
            Some(principal) => Ok(Caller::Authenticated(principal)),
            None => {
                tracing::warn!("rejected request with invalid bearer token");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}
