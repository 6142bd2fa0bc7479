// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Salon, service and employee mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use salon_booking_domain::{DurationMinutes, Employee, Salon, SalonTimezone, Service};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{employees, salons, services};
use crate::error::PersistenceError;
use crate::queries::catalog::{get_employee, get_salon};

/// Creates a salon.
///
/// The raw operating hours are stored exactly as given, in whatever encoding
/// the caller supplied.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_salon(
    conn: &mut SqliteConnection,
    name: &str,
    timezone: &SalonTimezone,
    operating_hours: Option<&str>,
) -> Result<Salon, PersistenceError> {
    diesel::insert_into(salons::table)
        .values((
            salons::name.eq(name),
            salons::timezone.eq(timezone.name()),
            salons::operating_hours.eq(operating_hours),
        ))
        .execute(conn)?;

    let salon_id: i64 = conn.get_last_insert_rowid()?;
    info!(salon_id, timezone = timezone.name(), "Created salon");

    Ok(Salon {
        salon_id,
        name: name.to_string(),
        timezone: timezone.clone(),
        operating_hours: operating_hours.map(str::to_string),
    })
}

/// Replaces a salon's raw operating hours setting.
///
/// # Errors
///
/// Returns `PersistenceError::SalonNotFound` if the salon does not exist.
pub fn set_salon_operating_hours(
    conn: &mut SqliteConnection,
    salon_id: i64,
    operating_hours: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(salons::table.filter(salons::salon_id.eq(salon_id)))
        .set(salons::operating_hours.eq(operating_hours))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::SalonNotFound(salon_id));
    }
    info!(salon_id, "Updated salon operating hours");
    Ok(())
}

/// Creates an active service.
///
/// # Errors
///
/// Returns `PersistenceError::SalonNotFound` if the salon does not exist.
pub fn create_service(
    conn: &mut SqliteConnection,
    salon_id: i64,
    name: &str,
    duration: DurationMinutes,
) -> Result<Service, PersistenceError> {
    get_salon(conn, salon_id)?;

    diesel::insert_into(services::table)
        .values((
            services::salon_id.eq(salon_id),
            services::name.eq(name),
            services::duration_minutes.eq(i32::from(duration.get())),
            services::is_active.eq(1),
        ))
        .execute(conn)?;

    let service_id: i64 = conn.get_last_insert_rowid()?;
    info!(service_id, salon_id, duration_minutes = duration.get(), "Created service");

    Ok(Service {
        service_id,
        salon_id,
        name: name.to_string(),
        duration,
        is_active: true,
    })
}

/// Creates an active employee.
///
/// # Errors
///
/// Returns `PersistenceError::SalonNotFound` if the salon does not exist.
pub fn create_employee(
    conn: &mut SqliteConnection,
    salon_id: i64,
    name: &str,
) -> Result<Employee, PersistenceError> {
    get_salon(conn, salon_id)?;

    diesel::insert_into(employees::table)
        .values((
            employees::salon_id.eq(salon_id),
            employees::name.eq(name),
            employees::is_active.eq(1),
        ))
        .execute(conn)?;

    let employee_id: i64 = conn.get_last_insert_rowid()?;
    info!(employee_id, salon_id, "Created employee");

    Ok(Employee {
        employee_id,
        salon_id,
        name: name.to_string(),
        is_active: true,
    })
}

/// Activates or deactivates an employee.
///
/// Inactive employees drop out of availability and "any" assignment; their
/// existing appointments are left alone.
///
/// # Errors
///
/// Returns `PersistenceError::EmployeeNotFound` if the employee does not exist.
pub fn set_employee_active(
    conn: &mut SqliteConnection,
    employee_id: i64,
    is_active: bool,
) -> Result<Employee, PersistenceError> {
    let updated: usize =
        diesel::update(employees::table.filter(employees::employee_id.eq(employee_id)))
            .set(employees::is_active.eq(i32::from(is_active)))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::EmployeeNotFound(employee_id));
    }
    info!(employee_id, is_active, "Updated employee status");
    get_employee(conn, employee_id)
}
