// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingLedger, LedgerError, Rejection, ValidationOutcome, validate_booking};
use salon_booking_domain::{
    Appointment, AppointmentStatus, AssignmentMode, BookingRequest, DateRange, DayAvailability,
    DurationMinutes, Employee, Salon, SalonTimezone, Service, TimeSlot, employee_time_slots,
    resolve_stored_operating_hours, summarize_slots,
};
use time::{Date, PrimitiveDateTime};

pub const SALON_ID: i64 = 1;
pub const SERVICE_ID: i64 = 10;
pub const ALICE: i64 = 100;
pub const BOB: i64 = 101;

/// An in-memory ledger with the same commit semantics as the database.
#[derive(Debug, Default)]
pub struct FakeLedger {
    pub salons: Vec<Salon>,
    pub services: Vec<Service>,
    pub employees: Vec<Employee>,
    pub appointments: Vec<Appointment>,
    pub fail_reads: bool,
}

impl FakeLedger {
    fn check_available(&self) -> Result<(), LedgerError> {
        if self.fail_reads {
            return Err(LedgerError::Unavailable(String::from("offline")));
        }
        Ok(())
    }

    fn salon_employees(&self, salon_id: i64) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .employees
            .iter()
            .filter(|employee| employee.salon_id == salon_id && employee.is_active)
            .map(|employee| employee.employee_id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl BookingLedger for FakeLedger {
    fn salon(&mut self, salon_id: i64) -> Result<Salon, LedgerError> {
        self.check_available()?;
        self.salons
            .iter()
            .find(|salon| salon.salon_id == salon_id)
            .cloned()
            .ok_or(LedgerError::NotFound {
                entity: "Salon",
                id: salon_id,
            })
    }

    fn service(&mut self, service_id: i64) -> Result<Service, LedgerError> {
        self.check_available()?;
        self.services
            .iter()
            .find(|service| service.service_id == service_id)
            .cloned()
            .ok_or(LedgerError::NotFound {
                entity: "Service",
                id: service_id,
            })
    }

    fn active_employee(&mut self, employee_id: i64) -> Result<Employee, LedgerError> {
        self.check_available()?;
        self.employees
            .iter()
            .find(|employee| employee.employee_id == employee_id && employee.is_active)
            .cloned()
            .ok_or(LedgerError::NotFound {
                entity: "Employee",
                id: employee_id,
            })
    }

    fn appointments_for_employee(
        &mut self,
        employee_id: i64,
        date: Date,
    ) -> Result<Vec<Appointment>, LedgerError> {
        self.check_available()?;
        let mut found: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|appointment| {
                appointment.employee_id == Some(employee_id)
                    && (appointment.scheduled_start.date() == date
                        || appointment.scheduled_end.date() == date)
            })
            .cloned()
            .collect();
        found.sort_by_key(|appointment| appointment.scheduled_start);
        Ok(found)
    }

    fn employee_availability(
        &mut self,
        employee_id: i64,
        range: &DateRange,
        service_id: i64,
        duration: DurationMinutes,
        now: PrimitiveDateTime,
    ) -> Result<Vec<DayAvailability>, LedgerError> {
        range
            .days()
            .map(|date| {
                let slots: Vec<TimeSlot> =
                    self.employee_time_slots(employee_id, date, duration, service_id, now)?;
                Ok(summarize_slots(date, &slots))
            })
            .collect()
    }

    fn employee_time_slots(
        &mut self,
        employee_id: i64,
        date: Date,
        duration: DurationMinutes,
        _service_id: i64,
        now: PrimitiveDateTime,
    ) -> Result<Vec<TimeSlot>, LedgerError> {
        let salon_id: i64 = self.active_employee(employee_id)?.salon_id;
        let raw: Option<String> = self.operating_hours(salon_id)?;
        let hours = resolve_stored_operating_hours(raw.as_deref()).hours_or_default();
        let booked: Vec<Appointment> = self.appointments_for_employee(employee_id, date)?;
        Ok(employee_time_slots(date, &hours, duration, now, &booked))
    }

    fn create_appointment(
        &mut self,
        request: &BookingRequest,
        now: PrimitiveDateTime,
    ) -> Result<Appointment, LedgerError> {
        let service: Service = self.service(request.service_id)?;

        let employee_id: i64 = match request.assignment_mode {
            AssignmentMode::Specific => {
                let employee_id: i64 = request.employee_id.unwrap_or_default();
                self.active_employee(employee_id)?;
                employee_id
            }
            AssignmentMode::Any => {
                let window = request.window();
                self.salon_employees(service.salon_id)
                    .into_iter()
                    .find(|candidate| {
                        !self.appointments.iter().any(|appointment| {
                            appointment.employee_id == Some(*candidate)
                                && appointment.blocks(&window)
                        })
                    })
                    .ok_or_else(|| LedgerError::Conflict {
                        reason: String::from("No employee is free for this time slot"),
                    })?
            }
        };

        let mut assigned: BookingRequest = request.clone();
        assigned.employee_id = Some(employee_id);
        assigned.assignment_mode = AssignmentMode::Specific;
        match validate_booking(&assigned, &service, &self.appointments, now) {
            ValidationOutcome::Accepted => {}
            ValidationOutcome::Rejected(rejection) => {
                return Err(match rejection.kind {
                    crate::RejectionKind::OverlapConflict => LedgerError::Conflict {
                        reason: rejection.reason,
                    },
                    _ => LedgerError::Rejected(rejection),
                });
            }
        }

        let appointment: Appointment = Appointment {
            appointment_id: i64::try_from(self.appointments.len()).unwrap() + 1,
            salon_id: service.salon_id,
            employee_id: Some(employee_id),
            service_id: service.service_id,
            customer_id: request.customer_id,
            scheduled_start: request.scheduled_start,
            scheduled_end: request.scheduled_end,
            status: AppointmentStatus::Pending,
        };
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }
}

pub fn create_test_service(duration: u16) -> Service {
    Service {
        service_id: SERVICE_ID,
        salon_id: SALON_ID,
        name: String::from("Haircut"),
        duration: DurationMinutes::new(duration).unwrap(),
        is_active: true,
    }
}

pub fn create_test_employee(employee_id: i64) -> Employee {
    Employee {
        employee_id,
        salon_id: SALON_ID,
        name: format!("Stylist {employee_id}"),
        is_active: true,
    }
}

/// A UTC salon open 09:00-17:00 Monday to Friday, with two stylists and a 60 minute service.
pub fn create_test_ledger() -> FakeLedger {
    let hours: &str = r#"{
        "monday": {"isOpen": true, "startTime": "09:00", "endTime": "17:00"},
        "tuesday": {"isOpen": true, "startTime": "09:00", "endTime": "17:00"},
        "wednesday": {"isOpen": true, "startTime": "09:00", "endTime": "17:00"},
        "thursday": {"isOpen": true, "startTime": "09:00", "endTime": "17:00"},
        "friday": {"isOpen": true, "startTime": "09:00", "endTime": "17:00"},
        "saturday": {"isOpen": false, "startTime": "00:00", "endTime": "00:00"},
        "sunday": {"isOpen": false, "startTime": "00:00", "endTime": "00:00"}
    }"#;

    FakeLedger {
        salons: vec![Salon {
            salon_id: SALON_ID,
            name: String::from("Main Street"),
            timezone: SalonTimezone::utc(),
            operating_hours: Some(hours.to_string()),
        }],
        services: vec![create_test_service(60)],
        employees: vec![create_test_employee(ALICE), create_test_employee(BOB)],
        appointments: Vec::new(),
        fail_reads: false,
    }
}

pub fn create_test_request(
    mode: AssignmentMode,
    employee_id: Option<i64>,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
) -> BookingRequest {
    BookingRequest {
        employee_id,
        service_id: SERVICE_ID,
        scheduled_start: start,
        scheduled_end: end,
        customer_id: 500,
        assignment_mode: mode,
    }
}

pub fn create_test_appointment(
    employee_id: i64,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        appointment_id: 900,
        salon_id: SALON_ID,
        employee_id: Some(employee_id),
        service_id: SERVICE_ID,
        customer_id: 501,
        scheduled_start: start,
        scheduled_end: end,
        status,
    }
}

pub fn rejection_of(outcome: &ValidationOutcome) -> &Rejection {
    outcome.rejection().expect("expected a rejection")
}
