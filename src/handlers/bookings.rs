use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub branch_id: String,
    #[serde(default)]
    pub booked_date: String,
    #[serde(default)]
    pub booked_time: String,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub branch_id: Option<String>,
    pub booked_date: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    user_id: String,
    service_id: String,
    branch_id: String,
    booked_date: String,
    booked_time: String,
    status: String,
    note: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        BookingResponse {
            id: b.id,
            user_id: b.user_id,
            service_id: b.service_id,
            branch_id: b.branch_id,
            booked_date: b.booked_date,
            booked_time: b.booked_time,
            status: b.status.as_str().to_string(),
            note: b.note,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        booking::create_booking(
            &db,
            &state.catalog,
            NewBooking {
                user_id: req.user_id,
                service_id: req.service_id,
                branch_id: req.branch_id,
                booked_date: req.booked_date,
                booked_time: req.booked_time,
                note: req.note,
            },
        )?
    };

    Ok((StatusCode::CREATED, Json(booking.into())))
}

// GET /api/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let filter = queries::BookingFilter {
        status: query.status,
        user_id: query.user_id,
        branch_id: query.branch_id,
        booked_date: query.booked_date,
        limit: query.limit,
    };

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db, &filter)?
    };

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_id(&db, &id)?
    };

    match booking {
        Some(b) => Ok(Json(b.into())),
        None => Err(AppError::NotFound(format!("booking {id}"))),
    }
}

// GET /api/users/:user_id/bookings
pub async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_user_bookings(&db, &user_id)?
    };

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

// PATCH /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let status = BookingStatus::parse(&req.status).ok_or_else(|| {
        AppError::InvalidParameter(format!(
            "status must be one of PENDING, CONFIRMED, CANCELLED, COMPLETED, got {:?}",
            req.status
        ))
    })?;

    let booking = {
        let db = state.db.lock().unwrap();
        booking::update_booking_status(&db, &id, status)?
    };

    Ok(Json(booking.into()))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    {
        let db = state.db.lock().unwrap();
        booking::delete_booking(&db, &id)?;
    }

    Ok(StatusCode::NO_CONTENT)
}
