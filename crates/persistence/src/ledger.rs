// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use salon_booking::{BookingLedger, LedgerError};
use salon_booking_domain::{
    Appointment, BookingRequest, DateRange, DayAvailability, DurationMinutes, Employee,
    HoursResolution, OperatingHours, Salon, Service, TimeSlot, employee_time_slots,
    resolve_stored_operating_hours, summarize_slots,
};
use time::{Date, PrimitiveDateTime};
use tracing::{debug, warn};

use crate::Persistence;
use crate::error::PersistenceError;
use crate::queries;

impl Persistence {
    /// The operating hours of an employee's salon, defaulting when unconfigured.
    fn employee_hours(&mut self, employee: &Employee) -> Result<OperatingHours, PersistenceError> {
        let salon: Salon = queries::catalog::get_salon(&mut self.conn, employee.salon_id)?;
        let resolution: HoursResolution =
            resolve_stored_operating_hours(salon.operating_hours.as_deref());
        match resolution {
            HoursResolution::Resolved { encoding, .. } => {
                debug!(salon_id = salon.salon_id, encoding = encoding.as_str(), "Resolved operating hours");
            }
            HoursResolution::NotConfigured => {
                warn!(salon_id = salon.salon_id, "Operating hours not configured; using default window");
            }
        }
        Ok(resolution.hours_or_default())
    }
}

impl BookingLedger for Persistence {
    fn salon(&mut self, salon_id: i64) -> Result<Salon, LedgerError> {
        Ok(queries::catalog::get_salon(&mut self.conn, salon_id)?)
    }

    fn service(&mut self, service_id: i64) -> Result<Service, LedgerError> {
        Ok(queries::catalog::get_service(&mut self.conn, service_id)?)
    }

    fn active_employee(&mut self, employee_id: i64) -> Result<Employee, LedgerError> {
        Ok(queries::catalog::get_active_employee(
            &mut self.conn,
            employee_id,
        )?)
    }

    fn appointments_for_employee(
        &mut self,
        employee_id: i64,
        date: Date,
    ) -> Result<Vec<Appointment>, LedgerError> {
        Ok(queries::appointments::list_appointments_for_employee(
            &mut self.conn,
            employee_id,
            date,
        )?)
    }

    fn employee_availability(
        &mut self,
        employee_id: i64,
        range: &DateRange,
        service_id: i64,
        duration: DurationMinutes,
        now: PrimitiveDateTime,
    ) -> Result<Vec<DayAvailability>, LedgerError> {
        let employee: Employee = queries::catalog::get_active_employee(&mut self.conn, employee_id)?;
        let hours: OperatingHours = self.employee_hours(&employee)?;
        let booked: Vec<Appointment> = queries::appointments::list_appointments_between(
            &mut self.conn,
            employee_id,
            range.start(),
            range.end(),
        )?;
        debug!(
            employee_id,
            service_id,
            appointments = booked.len(),
            "Summarizing employee availability"
        );

        Ok(range
            .days()
            .map(|date| {
                let slots: Vec<TimeSlot> = employee_time_slots(date, &hours, duration, now, &booked);
                summarize_slots(date, &slots)
            })
            .collect())
    }

    fn employee_time_slots(
        &mut self,
        employee_id: i64,
        date: Date,
        duration: DurationMinutes,
        service_id: i64,
        now: PrimitiveDateTime,
    ) -> Result<Vec<TimeSlot>, LedgerError> {
        let employee: Employee = queries::catalog::get_active_employee(&mut self.conn, employee_id)?;
        let hours: OperatingHours = self.employee_hours(&employee)?;
        let booked: Vec<Appointment> =
            queries::appointments::list_appointments_for_employee(&mut self.conn, employee_id, date)?;
        debug!(employee_id, service_id, %date, "Generating employee time slots");

        Ok(employee_time_slots(date, &hours, duration, now, &booked))
    }

    fn create_appointment(
        &mut self,
        request: &BookingRequest,
        now: PrimitiveDateTime,
    ) -> Result<Appointment, LedgerError> {
        Ok(crate::mutations::appointments::create_appointment(
            &mut self.conn,
            request,
            now,
        )?)
    }
}
