// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment mutations.
//!
//! `create_appointment` is the authoritative booking commit. It runs inside a
//! `BEGIN IMMEDIATE` transaction, which takes the database write lock before
//! the overlap scan. Two concurrent commits for the same employee and window
//! therefore run one after the other, and the second sees the first's row.

use diesel::SqliteConnection;
use diesel::prelude::*;
use salon_booking::{RejectionKind, ValidationOutcome, validate_booking};
use salon_booking_domain::format::format_local_datetime;
use salon_booking_domain::{
    Appointment, AppointmentStatus, AssignmentMode, BookingRequest, BookingWindow, Service,
};
use time::PrimitiveDateTime;
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::appointments;
use crate::error::PersistenceError;
use crate::queries::appointments::{find_blocking_overlaps, get_appointment};
use crate::queries::catalog::{get_active_employee, get_service, list_active_employee_ids};

/// Reason given when no employee can take an "any available" booking.
const NO_EMPLOYEE_FREE: &str = "No employee is available for this time slot";

/// Commits a booking with a serialized overlap check.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - The booking to commit
/// * `now` - The salon-local current time
///
/// # Returns
///
/// The stored appointment, with status `pending` and an assigned employee.
///
/// # Errors
///
/// Returns an error if:
/// - The window overlaps a pending or confirmed appointment of the employee
///   (`AppointmentConflict`)
/// - No active employee is free for an "any" booking (`AppointmentConflict`)
/// - The request is in the past or malformed (`BookingRejected`)
/// - The service or employee does not exist or is inactive
pub fn create_appointment(
    conn: &mut SqliteConnection,
    request: &BookingRequest,
    now: PrimitiveDateTime,
) -> Result<Appointment, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let service: Service = get_service(conn, request.service_id)?;
        let window: BookingWindow = request.window();

        let employee_id: i64 = match request.assignment_mode {
            AssignmentMode::Specific => specific_employee(conn, request, &service)?,
            AssignmentMode::Any => first_free_employee(conn, service.salon_id, &window)?
                .ok_or_else(|| {
                    info!(
                        service_id = service.service_id,
                        salon_id = service.salon_id,
                        "No employee free for any-available booking"
                    );
                    PersistenceError::AppointmentConflict {
                        employee_id: None,
                        reason: NO_EMPLOYEE_FREE.to_string(),
                    }
                })?,
        };

        let mut assigned: BookingRequest = request.clone();
        assigned.employee_id = Some(employee_id);
        assigned.assignment_mode = AssignmentMode::Specific;

        let existing: Vec<Appointment> = find_blocking_overlaps(conn, employee_id, &window)?;
        if let ValidationOutcome::Rejected(rejection) =
            validate_booking(&assigned, &service, &existing, now)
        {
            return Err(if rejection.kind == RejectionKind::OverlapConflict {
                info!(employee_id, reason = %rejection.reason, "Booking lost to an overlapping appointment");
                PersistenceError::AppointmentConflict {
                    employee_id: Some(employee_id),
                    reason: rejection.reason,
                }
            } else {
                warn!(
                    employee_id,
                    kind = rejection.kind.as_str(),
                    reason = %rejection.reason,
                    "Booking rejected at commit"
                );
                PersistenceError::BookingRejected(rejection)
            });
        }

        insert_appointment(conn, &assigned, service.salon_id)
    })
}

/// Resolves and checks the employee named by a specific booking.
fn specific_employee(
    conn: &mut SqliteConnection,
    request: &BookingRequest,
    service: &Service,
) -> Result<i64, PersistenceError> {
    let Some(employee_id) = request.employee_id else {
        warn!(service_id = service.service_id, "Specific booking without an employee");
        return Err(PersistenceError::BookingRejected(salon_booking::Rejection::new(
            RejectionKind::MalformedRequest,
            "An employee must be selected for a specific booking",
        )));
    };

    let employee = get_active_employee(conn, employee_id)?;
    if employee.salon_id != service.salon_id {
        warn!(employee_id, salon_id = service.salon_id, "Employee works at another salon");
        return Err(PersistenceError::BookingRejected(salon_booking::Rejection::new(
            RejectionKind::MalformedRequest,
            format!(
                "Employee {employee_id} does not work at salon {}",
                service.salon_id
            ),
        )));
    }
    Ok(employee_id)
}

/// The lowest-id active employee with no blocking appointment in the window.
fn first_free_employee(
    conn: &mut SqliteConnection,
    salon_id: i64,
    window: &BookingWindow,
) -> Result<Option<i64>, PersistenceError> {
    for employee_id in list_active_employee_ids(conn, salon_id)? {
        if find_blocking_overlaps(conn, employee_id, window)?.is_empty() {
            debug!(employee_id, salon_id, "Assigned employee for any-available booking");
            return Ok(Some(employee_id));
        }
    }
    Ok(None)
}

fn insert_appointment(
    conn: &mut SqliteConnection,
    request: &BookingRequest,
    salon_id: i64,
) -> Result<Appointment, PersistenceError> {
    let status: AppointmentStatus = AppointmentStatus::Pending;

    diesel::insert_into(appointments::table)
        .values((
            appointments::salon_id.eq(salon_id),
            appointments::employee_id.eq(request.employee_id),
            appointments::service_id.eq(request.service_id),
            appointments::customer_id.eq(request.customer_id),
            appointments::scheduled_start.eq(format_local_datetime(request.scheduled_start)?),
            appointments::scheduled_end.eq(format_local_datetime(request.scheduled_end)?),
            appointments::status.eq(status.as_str()),
        ))
        .execute(conn)?;

    let appointment_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        appointment_id,
        employee_id = request.employee_id,
        salon_id,
        "Committed appointment"
    );

    Ok(Appointment {
        appointment_id,
        salon_id,
        employee_id: request.employee_id,
        service_id: request.service_id,
        customer_id: request.customer_id,
        scheduled_start: request.scheduled_start,
        scheduled_end: request.scheduled_end,
        status,
    })
}

/// Returns whether an appointment may move from `from` to `to`.
///
/// `pending -> confirmed | cancelled`, `confirmed -> cancelled | completed`.
#[must_use]
pub const fn is_allowed_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    matches!(
        (from, to),
        (
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed | AppointmentStatus::Cancelled
        ) | (
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled | AppointmentStatus::Completed
        )
    )
}

/// Moves an appointment to a new status.
///
/// # Errors
///
/// Returns `PersistenceError::AppointmentNotFound` if the appointment does not
/// exist, or `InvalidStatusTransition` if the lifecycle forbids the move.
pub fn update_appointment_status(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    status: AppointmentStatus,
) -> Result<Appointment, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let mut appointment: Appointment = get_appointment(conn, appointment_id)?;
        if !is_allowed_transition(appointment.status, status) {
            return Err(PersistenceError::InvalidStatusTransition {
                appointment_id,
                from: appointment.status.to_string(),
                to: status.to_string(),
            });
        }

        diesel::update(
            appointments::table.filter(appointments::appointment_id.eq(appointment_id)),
        )
        .set((
            appointments::status.eq(status.as_str()),
            appointments::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

        info!(appointment_id, from = %appointment.status, to = %status, "Appointment status changed");
        appointment.status = status;
        Ok(appointment)
    })
}

/// Cancels a pending or confirmed appointment, freeing its window.
///
/// # Errors
///
/// Returns an error if the appointment does not exist or is already
/// cancelled or completed.
pub fn cancel_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Appointment, PersistenceError> {
    update_appointment_status(conn, appointment_id, AppointmentStatus::Cancelled)
}
