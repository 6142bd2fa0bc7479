// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment queries.
//!
//! Scheduled times are stored as `YYYY-MM-DDTHH:MM` text, so overlap tests
//! compare strings. The fixed-width format keeps text order equal to time order.

use diesel::SqliteConnection;
use diesel::prelude::*;
use salon_booking_domain::format::{format_local_datetime, parse_local_datetime};
use salon_booking_domain::{Appointment, AppointmentStatus, BookingWindow};
use std::str::FromStr;
use time::{Date, PrimitiveDateTime, Time};
use tracing::debug;

use crate::diesel_schema::appointments;
use crate::error::PersistenceError;

/// Statuses that occupy an employee's time.
pub const BLOCKING_STATUSES: [&str; 2] = [
    AppointmentStatus::Pending.as_str(),
    AppointmentStatus::Confirmed.as_str(),
];

/// Diesel Queryable struct for appointment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = appointments)]
struct AppointmentRow {
    appointment_id: i64,
    salon_id: i64,
    employee_id: Option<i64>,
    service_id: i64,
    customer_id: i64,
    scheduled_start: String,
    scheduled_end: String,
    status: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = PersistenceError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            appointment_id: row.appointment_id,
            salon_id: row.salon_id,
            employee_id: row.employee_id,
            service_id: row.service_id,
            customer_id: row.customer_id,
            scheduled_start: parse_local_datetime(&row.scheduled_start)?,
            scheduled_end: parse_local_datetime(&row.scheduled_end)?,
            status: AppointmentStatus::from_str(&row.status)?,
        })
    }
}

fn rows_to_appointments(rows: Vec<AppointmentRow>) -> Result<Vec<Appointment>, PersistenceError> {
    rows.into_iter().map(Appointment::try_from).collect()
}

/// Retrieves an appointment by ID.
///
/// # Errors
///
/// Returns `PersistenceError::AppointmentNotFound` if no such appointment exists.
pub fn get_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Appointment, PersistenceError> {
    let row: AppointmentRow = appointments::table
        .filter(appointments::appointment_id.eq(appointment_id))
        .select(AppointmentRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::AppointmentNotFound(appointment_id))?;

    Appointment::try_from(row)
}

/// Lists one employee's appointments that touch the window, any status, ordered by start.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_appointments_in_window(
    conn: &mut SqliteConnection,
    employee_id: i64,
    window: &BookingWindow,
) -> Result<Vec<Appointment>, PersistenceError> {
    let start: String = format_local_datetime(window.start)?;
    let end: String = format_local_datetime(window.end)?;

    let rows: Vec<AppointmentRow> = appointments::table
        .filter(appointments::employee_id.eq(employee_id))
        .filter(appointments::scheduled_start.lt(&end))
        .filter(appointments::scheduled_end.gt(&start))
        .order(appointments::scheduled_start.asc())
        .select(AppointmentRow::as_select())
        .load(conn)?;

    rows_to_appointments(rows)
}

/// Lists one employee's appointments on a salon-local date, ordered by start.
///
/// An appointment belongs to the date if any part of it falls on that day.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_appointments_for_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
    date: Date,
) -> Result<Vec<Appointment>, PersistenceError> {
    debug!(employee_id, %date, "Listing appointments for employee");
    list_appointments_in_window(conn, employee_id, &day_window(date, date)?)
}

/// Lists one employee's appointments across an inclusive date range.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_appointments_between(
    conn: &mut SqliteConnection,
    employee_id: i64,
    first: Date,
    last: Date,
) -> Result<Vec<Appointment>, PersistenceError> {
    list_appointments_in_window(conn, employee_id, &day_window(first, last)?)
}

/// Finds an employee's pending or confirmed appointments overlapping the window.
///
/// Uses `existing.start < requested.end AND existing.end > requested.start`.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn find_blocking_overlaps(
    conn: &mut SqliteConnection,
    employee_id: i64,
    window: &BookingWindow,
) -> Result<Vec<Appointment>, PersistenceError> {
    let start: String = format_local_datetime(window.start)?;
    let end: String = format_local_datetime(window.end)?;

    let rows: Vec<AppointmentRow> = appointments::table
        .filter(appointments::employee_id.eq(employee_id))
        .filter(appointments::status.eq_any(BLOCKING_STATUSES))
        .filter(appointments::scheduled_start.lt(&end))
        .filter(appointments::scheduled_end.gt(&start))
        .order(appointments::scheduled_start.asc())
        .select(AppointmentRow::as_select())
        .load(conn)?;

    rows_to_appointments(rows)
}

/// The window from midnight on `first` to midnight after `last`.
fn day_window(first: Date, last: Date) -> Result<BookingWindow, PersistenceError> {
    let after: Date = last.next_day().ok_or_else(|| {
        PersistenceError::InvalidData(format!("no calendar day follows {last}"))
    })?;
    Ok(BookingWindow::new(
        PrimitiveDateTime::new(first, Time::MIDNIGHT),
        PrimitiveDateTime::new(after, Time::MIDNIGHT),
    ))
}
