//! Development helpers, mounted only when `DEV_MODE` is set.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Principal;
use crate::services::tokens;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TokenRequest {
    pub principal: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// POST /api/dev/token
pub async fn mint_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let principal = Principal::parse(body.principal.trim())
        .ok_or_else(|| AppError::BadRequest(format!("invalid principal: {:?}", body.principal)))?;

    let token = tokens::mint(&state.config.token_secret, &principal)?;
    tracing::info!(%principal, "minted dev token");
    Ok(Json(TokenResponse { token }))
}
