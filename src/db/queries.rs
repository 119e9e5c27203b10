use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ── Referenced entities ──
//
// The catalog itself (users, branches, services) is managed elsewhere; the
// store only needs inserts for seeding and existence probes for the
// referential checks on booking creation.

pub fn create_user(conn: &Connection, id: &str, name: &str, email: &str) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3)",
        params![id, name, email],
    )?;
    Ok(())
}

pub fn create_branch(
    conn: &Connection,
    id: &str,
    name: &str,
    address: Option<&str>,
) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO branches (id, name, address) VALUES (?1, ?2, ?3)",
        params![id, name, address],
    )?;
    Ok(())
}

pub fn create_service(conn: &Connection, id: &str, name: &str) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO services (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    Ok(())
}

pub fn user_exists(conn: &Connection, id: &str) -> Result<bool, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn branch_exists(conn: &Connection, id: &str) -> Result<bool, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM branches WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn service_exists(conn: &Connection, id: &str) -> Result<bool, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM services WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

// ── Bookings ──

/// Insert a booking after verifying every referenced identity exists.
/// Callers run this inside a transaction together with the conflict and
/// capacity counts.
pub fn insert_booking(conn: &Connection, booking: &Booking) -> Result<(), AppError> {
    if !service_exists(conn, &booking.service_id)? {
        return Err(AppError::ServiceNotFound);
    }
    if !branch_exists(conn, &booking.branch_id)? {
        return Err(AppError::BranchNotFound);
    }
    if !user_exists(conn, &booking.user_id)? {
        return Err(AppError::UserNotFound);
    }

    let created_at = booking.created_at.format(DATETIME_FMT).to_string();
    let updated_at = booking.updated_at.format(DATETIME_FMT).to_string();

    let result = conn.execute(
        "INSERT INTO bookings (id, user_id, service_id, branch_id, booked_date, booked_time, status, note, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.user_id,
            booking.service_id,
            booking.branch_id,
            booking.booked_date,
            booking.booked_time,
            booking.status.as_str(),
            booking.note,
            created_at,
            updated_at,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        // The partial unique index on (user_id, booked_date, booked_time)
        // backs the application-level conflict check.
        Err(rusqlite::Error::SqliteFailure(e, Some(msg)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("bookings.user_id") =>
        {
            Err(AppError::UserAlreadyBooked)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn count_user_bookings_at_slot(
    conn: &Connection,
    user_id: &str,
    booked_date: &str,
    booked_time: &str,
) -> Result<i64, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE user_id = ?1 AND booked_date = ?2 AND booked_time = ?3 AND status != 'CANCELLED'",
        params![user_id, booked_date, booked_time],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_branch_bookings_at_slot(
    conn: &Connection,
    branch_id: &str,
    booked_date: &str,
    booked_time: &str,
) -> Result<i64, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE branch_id = ?1 AND booked_date = ?2 AND booked_time = ?3 AND status != 'CANCELLED'",
        params![branch_id, booked_date, booked_time],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Time labels of every active booking for a branch and date. Duplicates are
/// meaningful: two rows at "09:00 AM" means the slot holds two bookings. An
/// empty store yields an empty list, never an error.
pub fn list_booked_time_labels(
    conn: &Connection,
    branch_id: &str,
    booked_date: &str,
) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT booked_time FROM bookings
         WHERE branch_id = ?1 AND booked_date = ?2 AND status != 'CANCELLED'",
    )?;

    let rows = stmt.query_map(params![branch_id, booked_date], |row| row.get(0))?;

    let mut labels = vec![];
    for row in rows {
        labels.push(row?);
    }
    Ok(labels)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> Result<Option<Booking>, AppError> {
    let result = conn.query_row(
        "SELECT id, user_id, service_id, branch_id, booked_date, booked_time, status, note, created_at, updated_at
         FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Default)]
pub struct BookingFilter {
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub branch_id: Option<String>,
    pub booked_date: Option<String>,
    pub limit: Option<i64>,
}

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
    let mut clauses: Vec<&str> = vec![];
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(status) = &filter.status {
        clauses.push("status = ?");
        params_vec.push(Box::new(status.clone()));
    }
    if let Some(user_id) = &filter.user_id {
        clauses.push("user_id = ?");
        params_vec.push(Box::new(user_id.clone()));
    }
    if let Some(branch_id) = &filter.branch_id {
        clauses.push("branch_id = ?");
        params_vec.push(Box::new(branch_id.clone()));
    }
    if let Some(booked_date) = &filter.booked_date {
        clauses.push("booked_date = ?");
        params_vec.push(Box::new(booked_date.clone()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT id, user_id, service_id, branch_id, booked_date, booked_time, status, note, created_at, updated_at
         FROM bookings {where_sql} ORDER BY created_at DESC LIMIT ?"
    );
    params_vec.push(Box::new(filter.limit.unwrap_or(50)));

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn list_user_bookings(conn: &Connection, user_id: &str) -> Result<Vec<Booking>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, service_id, branch_id, booked_date, booked_time, status, note, created_at, updated_at
         FROM bookings WHERE user_id = ?1 ORDER BY booked_date ASC, booked_time ASC",
    )?;

    let rows = stmt.query_map(params![user_id], parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> Result<bool, AppError> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> Result<bool, AppError> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        service_id: row.get(2)?,
        branch_id: row.get(3)?,
        booked_date: row.get(4)?,
        booked_time: row.get(5)?,
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        note: row.get(7)?,
        created_at,
        updated_at,
    })
}
