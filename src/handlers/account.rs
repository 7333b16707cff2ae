use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::{Caller, UserProfile, UserRole};
use crate::services::gate::{self, Operation};
use crate::services::identity;
use crate::state::AppState;

// GET /api/me/role
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.conn();
    let role: UserRole = gate::authorize(
        &db,
        state.config.owner_principal.as_ref(),
        &caller,
        Operation::GetCallerUserRole,
    )?;
    Ok(Json(serde_json::json!({ "role": role })))
}

// GET /api/me/admin
pub async fn is_admin(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.conn();
    let owner = state.config.owner_principal.as_ref();
    gate::authorize(&db, owner, &caller, Operation::IsCallerAdmin)?;

    let admin = identity::is_admin(&db, owner, &caller)?;
    Ok(Json(serde_json::json!({ "admin": admin })))
}

// GET /api/me/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Option<UserProfile>>, AppError> {
    let db = state.conn();
    gate::authorize(
        &db,
        state.config.owner_principal.as_ref(),
        &caller,
        Operation::GetCallerUserProfile,
    )?;

    Ok(Json(identity::caller_profile(&db, &caller)?))
}

// PUT /api/me/profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(profile): Json<UserProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.conn();
    let principal = gate::authorize_principal(
        &db,
        state.config.owner_principal.as_ref(),
        &caller,
        Operation::SaveCallerUserProfile,
    )?;

    identity::save_profile(&db, principal, &profile)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
