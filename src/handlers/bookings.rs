use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{BookingDetails, BookingId, BookingRecord, BookingStatus, Caller, Vehicle, FLEET};
use crate::services::bookings::{self, SubmitOutcome};
use crate::services::gate::{self, Operation};
use crate::services::lookup;
use crate::state::AppState;

pub(crate) fn parse_booking_id(raw: &str) -> Result<BookingId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid booking id: {raw:?}")))
}

// GET /api/vehicles
pub async fn list_vehicles(caller: Caller) -> Result<Json<&'static [Vehicle]>, AppError> {
    // static catalogue: decided without the database lock
    gate::authorize_public(&caller, Operation::ListVehicles)?;
    Ok(Json(FLEET))
}

// POST /api/bookings
#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: BookingId,
}

pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(details): Json<BookingDetails>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let mut db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::SubmitBooking)?;

    match bookings::submit_booking(&mut db, &details)? {
        SubmitOutcome::Created(record) => Ok((StatusCode::CREATED, Json(SubmitResponse { id: record.id }))),
        SubmitOutcome::Rejected(err) => Err(err.into()),
    }
}

// GET /api/bookings?phone=
#[derive(Deserialize)]
pub struct PhoneQuery {
    #[serde(default)]
    pub phone: String,
}

pub async fn bookings_by_phone(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(query): Query<PhoneQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::GetBookingsByPhone)?;

    let found = lookup::bookings_by_phone(&db, &query.phone, state.config.phone_lookup)?;
    Ok(Json(found))
}

// GET /api/bookings/search?q=
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search_bookings(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::SearchBookings)?;

    let found = lookup::search(&db, &query.q, state.config.phone_lookup)?;
    Ok(Json(found))
}

// GET /api/bookings/:id/status
#[derive(Serialize)]
pub struct StatusResponse {
    pub id: BookingId,
    /// `null` when no such booking exists.
    pub status: Option<BookingStatus>,
}

pub async fn booking_status(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let db = state.conn();
    gate::authorize(&db, state.config.owner_principal.as_ref(), &caller, Operation::GetBookingStatusById)?;

    let id = parse_booking_id(&raw_id)?;
    let status = lookup::status_by_id(&db, id)?;
    Ok(Json(StatusResponse { id, status }))
}
