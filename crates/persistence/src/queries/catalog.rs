// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Salon, service and employee queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use salon_booking_domain::{DurationMinutes, Employee, Salon, SalonTimezone, Service};
use tracing::debug;

use crate::diesel_schema::{employees, salons, services};
use crate::error::PersistenceError;

/// Diesel Queryable struct for salon rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = salons)]
struct SalonRow {
    salon_id: i64,
    name: String,
    timezone: String,
    operating_hours: Option<String>,
}

impl TryFrom<SalonRow> for Salon {
    type Error = PersistenceError;

    fn try_from(row: SalonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            salon_id: row.salon_id,
            name: row.name,
            timezone: SalonTimezone::new(&row.timezone)?,
            operating_hours: row.operating_hours,
        })
    }
}

/// Diesel Queryable struct for service rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = services)]
struct ServiceRow {
    service_id: i64,
    salon_id: i64,
    name: String,
    duration_minutes: i32,
    is_active: i32,
}

impl TryFrom<ServiceRow> for Service {
    type Error = PersistenceError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let minutes: u16 = u16::try_from(row.duration_minutes).map_err(|_| {
            PersistenceError::InvalidData(format!(
                "service {} has duration {} out of range",
                row.service_id, row.duration_minutes
            ))
        })?;
        Ok(Self {
            service_id: row.service_id,
            salon_id: row.salon_id,
            name: row.name,
            duration: DurationMinutes::new(minutes)?,
            is_active: row.is_active != 0,
        })
    }
}

/// Diesel Queryable struct for employee rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    salon_id: i64,
    name: String,
    is_active: i32,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.employee_id,
            salon_id: row.salon_id,
            name: row.name,
            is_active: row.is_active != 0,
        }
    }
}

/// Retrieves a salon by ID.
///
/// # Errors
///
/// Returns `PersistenceError::SalonNotFound` if no such salon exists, or an
/// error if the stored timezone is invalid.
pub fn get_salon(conn: &mut SqliteConnection, salon_id: i64) -> Result<Salon, PersistenceError> {
    debug!(salon_id, "Looking up salon");

    let row: SalonRow = salons::table
        .filter(salons::salon_id.eq(salon_id))
        .select(SalonRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::SalonNotFound(salon_id))?;

    Salon::try_from(row)
}

/// Retrieves a service by ID, whether or not it is active.
///
/// # Errors
///
/// Returns `PersistenceError::ServiceNotFound` if no such service exists.
pub fn get_service(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> Result<Service, PersistenceError> {
    debug!(service_id, "Looking up service");

    let row: ServiceRow = services::table
        .filter(services::service_id.eq(service_id))
        .select(ServiceRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ServiceNotFound(service_id))?;

    Service::try_from(row)
}

/// Retrieves an employee by ID, whether or not they are active.
///
/// # Errors
///
/// Returns `PersistenceError::EmployeeNotFound` if no such employee exists.
pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Employee, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?
        .map(Employee::from)
        .ok_or(PersistenceError::EmployeeNotFound(employee_id))
}

/// Retrieves an employee who is currently taking bookings.
///
/// # Errors
///
/// Returns `PersistenceError::EmployeeNotFound` if the employee does not exist
/// or is inactive.
pub fn get_active_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Employee, PersistenceError> {
    let employee: Employee = get_employee(conn, employee_id)?;
    if !employee.is_active {
        debug!(employee_id, "Employee is inactive");
        return Err(PersistenceError::EmployeeNotFound(employee_id));
    }
    Ok(employee)
}

/// Lists the IDs of a salon's active employees, lowest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_employee_ids(
    conn: &mut SqliteConnection,
    salon_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(employees::table
        .filter(employees::salon_id.eq(salon_id))
        .filter(employees::is_active.eq(1))
        .order(employees::employee_id.asc())
        .select(employees::employee_id)
        .load::<i64>(conn)?)
}

/// Lists all of a salon's employees, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(
    conn: &mut SqliteConnection,
    salon_id: i64,
) -> Result<Vec<Employee>, PersistenceError> {
    Ok(employees::table
        .filter(employees::salon_id.eq(salon_id))
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Employee::from)
        .collect())
}
