use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Slot};
use crate::services::schedule::SlotCatalog;

#[derive(Debug, Clone, Default)]
pub struct NewBooking {
    pub user_id: String,
    pub service_id: String,
    pub branch_id: String,
    pub booked_date: String,
    pub booked_time: String,
    pub note: Option<String>,
}

/// A user may hold at most one active booking per exact date and time.
/// Holding other bookings on the same date at different times is fine.
pub fn check_user_conflict(
    conn: &Connection,
    user_id: &str,
    booked_date: &str,
    booked_time: &str,
) -> Result<(), AppError> {
    let count = queries::count_user_bookings_at_slot(conn, user_id, booked_date, booked_time)?;
    if count > 0 {
        return Err(AppError::UserAlreadyBooked);
    }
    Ok(())
}

/// Create a booking. The conflict check, the capacity check, and the insert
/// run in a single transaction so two concurrent requests cannot both pass
/// the checks before either writes.
pub fn create_booking(
    conn: &Connection,
    catalog: &SlotCatalog,
    req: NewBooking,
) -> Result<Booking, AppError> {
    if req.user_id.is_empty() {
        return Err(AppError::MissingParameter("user_id"));
    }
    if req.service_id.is_empty() {
        return Err(AppError::MissingParameter("service_id"));
    }
    if req.branch_id.is_empty() {
        return Err(AppError::MissingParameter("branch_id"));
    }
    if req.booked_date.is_empty() {
        return Err(AppError::MissingParameter("booked_date"));
    }
    if req.booked_time.is_empty() {
        return Err(AppError::MissingParameter("booked_time"));
    }

    if NaiveDate::parse_from_str(&req.booked_date, "%Y-%m-%d").is_err() {
        return Err(AppError::InvalidParameter(format!(
            "booked_date must be YYYY-MM-DD, got {:?}",
            req.booked_date
        )));
    }

    let tx = conn.unchecked_transaction()?;

    check_user_conflict(&tx, &req.user_id, &req.booked_date, &req.booked_time)?;

    let slot_count = queries::count_branch_bookings_at_slot(
        &tx,
        &req.branch_id,
        &req.booked_date,
        &req.booked_time,
    )?;
    if slot_count >= i64::from(catalog.capacity()) {
        return Err(AppError::SlotUnavailable);
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        user_id: req.user_id,
        service_id: req.service_id,
        branch_id: req.branch_id,
        booked_date: req.booked_date,
        booked_time: req.booked_time,
        status: BookingStatus::Pending,
        note: req.note,
        created_at: now,
        updated_at: now,
    };

    queries::insert_booking(&tx, &booking)?;
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        branch_id = %booking.branch_id,
        slot = %booking.booked_time,
        "booking created"
    );

    Ok(booking)
}

/// Availability of every catalog slot for a branch and date. An empty store
/// yields a fully available schedule.
pub fn get_available_slots(
    conn: &Connection,
    catalog: &SlotCatalog,
    branch_id: &str,
    booked_date: &str,
) -> Result<Vec<Slot>, AppError> {
    if branch_id.is_empty() {
        return Err(AppError::MissingParameter("branch_id"));
    }
    if booked_date.is_empty() {
        return Err(AppError::MissingParameter("booked_date"));
    }

    let taken = queries::list_booked_time_labels(conn, branch_id, booked_date)?;
    Ok(catalog.compute_availability(&taken))
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> Result<Booking, AppError> {
    if !queries::update_booking_status(conn, id, status)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

pub fn delete_booking(conn: &Connection, id: &str) -> Result<(), AppError> {
    if !queries::delete_booking(conn, id)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    Ok(())
}
