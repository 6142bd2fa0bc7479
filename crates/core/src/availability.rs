// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability queries composed over the ledger.
//!
//! The employee path delegates slot counting to the ledger and treats its
//! counts as authoritative. The "any available" path never touches the
//! ledger's appointments.

use crate::context::BookingContext;
use crate::error::CoreError;
use crate::ledger::BookingLedger;
use salon_booking_domain::{
    DateRange, DayAvailability, Employee, HoursResolution, TimeSlot, generate_slots_for_date,
    resolve_stored_operating_hours,
};
use time::Date;

/// Resolves a salon's operating hours through the ledger.
///
/// # Errors
///
/// Returns an error if the salon does not exist. Unparseable hours are not an
/// error; they resolve to `NotConfigured`.
pub fn resolve_salon_hours<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    salon_id: i64,
) -> Result<HoursResolution, CoreError> {
    let raw: Option<String> = ledger.operating_hours(salon_id)?;
    Ok(resolve_stored_operating_hours(raw.as_deref()))
}

/// Per-day availability for a specific employee.
///
/// # Arguments
///
/// * `ledger` - The appointment ledger
/// * `context` - The request context (service, salon, now)
/// * `employee_id` - The employee to query
/// * `range` - Salon-local dates to summarize
///
/// # Errors
///
/// Returns an error if the employee is missing, inactive, or works at a
/// different salon, or if the ledger fails.
pub fn employee_availability<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    employee_id: i64,
    range: &DateRange,
) -> Result<Vec<DayAvailability>, CoreError> {
    ensure_employee_in_salon(ledger, context, employee_id)?;
    let days: Vec<DayAvailability> = ledger.employee_availability(
        employee_id,
        range,
        context.service().service_id,
        context.duration(),
        context.now(),
    )?;

    Ok(days
        .into_iter()
        .map(|day| DayAvailability::from_counts(day.date, day.total_slots, day.available_slots))
        .collect())
}

/// One employee's slots for a day, pre-marked by the ledger.
///
/// # Errors
///
/// Returns an error if the employee is missing, inactive, or works at a
/// different salon, or if the ledger fails.
pub fn employee_time_slots<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    employee_id: i64,
    date: Date,
) -> Result<Vec<TimeSlot>, CoreError> {
    ensure_employee_in_salon(ledger, context, employee_id)?;
    Ok(ledger.employee_time_slots(
        employee_id,
        date,
        context.duration(),
        context.service().service_id,
        context.now(),
    )?)
}

/// Per-day "any available" estimate from operating hours alone.
#[must_use]
pub fn any_available_availability(
    context: &BookingContext,
    range: &DateRange,
) -> Vec<DayAvailability> {
    salon_booking_domain::any_available_availability(range, &context.operating_hours())
}

/// "Any available" slots for a day. No employee calendar applies, so the
/// generated slots are the answer.
#[must_use]
pub fn any_available_slots(context: &BookingContext, date: Date) -> Vec<TimeSlot> {
    generate_slots_for_date(
        date,
        &context.operating_hours(),
        context.duration(),
        context.now(),
    )
}

fn ensure_employee_in_salon<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    employee_id: i64,
) -> Result<Employee, CoreError> {
    let employee: Employee = ledger.active_employee(employee_id)?;
    if employee.salon_id != context.salon().salon_id {
        return Err(CoreError::SalonMismatch {
            expected: context.salon().salon_id,
            actual: employee.salon_id,
        });
    }
    Ok(employee)
}
