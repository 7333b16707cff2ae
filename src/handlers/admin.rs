use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{BookingRecord, BookingStats, BookingStatus, Caller, Principal, UserProfile, UserRole};
use crate::services::bookings;
use crate::services::gate::{self, Operation};
use crate::services::identity;
use crate::state::AppState;

use super::bookings::parse_booking_id;

fn parse_principal(raw: &str) -> Result<Principal, AppError> {
    Principal::parse(raw).ok_or_else(|| AppError::BadRequest(format!("invalid principal: {raw:?}")))
}

// GET /api/admin/bookings?status=
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<BookingStatus>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let db = state.conn();
    gate::authorize(
        &db,
        state.config.owner_principal.as_ref(),
        &caller,
        Operation::GetAllBookingsForAdmin,
    )?;

    let records = match query.status {
        Some(status) => bookings::bookings_with_status(&db, status)?,
        None => bookings::all_bookings(&db)?,
    };
    Ok(Json(records))
}

// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<BookingStats>, AppError> {
    let db = state.conn();
    gate::authorize(
        &db,
        state.config.owner_principal.as_ref(),
        &caller,
        Operation::GetBookingStats,
    )?;

    Ok(Json(bookings::stats(&db)?))
}

// PUT /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: bool,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(raw_id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let db = state.conn();
    gate::authorize(
        &db,
        state.config.owner_principal.as_ref(),
        &caller,
        Operation::UpdateBookingStatus,
    )?;

    let id = parse_booking_id(&raw_id)?;
    let updated = bookings::update_booking_status(&db, id, body.status)?;
    Ok(Json(UpdatedResponse { updated }))
}

// DELETE /api/admin/bookings/:id
#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::DeleteBooking)?;

    let id = parse_booking_id(&raw_id)?;
    let deleted = bookings::delete_booking(&db, id)?;
    Ok(Json(DeletedResponse { deleted }))
}

// PUT /api/admin/users/:principal/role
#[derive(Deserialize)]
pub struct AssignRoleRequest {
    pub role: UserRole,
}

pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(raw_principal): Path<String>,
    Json(body): Json<AssignRoleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.conn();
    let owner = state.config.owner_principal.as_ref();
    gate::authorize(&db, owner, &caller, Operation::AssignCallerUserRole)?;

    let principal = parse_principal(&raw_principal)?;
    identity::assign_role(&db, owner, &principal, body.role)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// GET /api/admin/users/:principal/profile
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(raw_principal): Path<String>,
) -> Result<Json<Option<UserProfile>>, AppError> {
    let db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::GetUserProfile)?;

    let principal = parse_principal(&raw_principal)?;
    Ok(Json(identity::user_profile(&db, &principal)?))
}

// GET /api/admin/users?name=
#[derive(Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
pub struct PrincipalResponse {
    /// `null` when no profile carries the name.
    pub principal: Option<Principal>,
}

pub async fn get_user_id_by_name(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(query): Query<NameQuery>,
) -> Result<Json<PrincipalResponse>, AppError> {
    let db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::GetUserIdByName)?;

    let principal = identity::principal_by_name(&db, &query.name)?;
    Ok(Json(PrincipalResponse { principal }))
}
