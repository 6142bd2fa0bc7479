// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod concurrency_tests;
mod initialization_tests;

use crate::SqlitePersistence;
use salon_booking_domain::{
    AssignmentMode, BookingRequest, DurationMinutes, Employee, Salon, SalonTimezone, Service,
};
use time::PrimitiveDateTime;
use time::macros::datetime;

/// Monday 2026-03-02, before opening.
pub const NOW: PrimitiveDateTime = datetime!(2026-03-02 08:00);

/// Weekdays 09:00-17:00, closed weekends, stored double-encoded the way
/// legacy clients wrote it.
pub fn create_test_hours() -> String {
    let day = |open: bool| {
        serde_json::json!({"isOpen": open, "startTime": "09:00", "endTime": "17:00"})
    };
    let hours = serde_json::json!({
        "monday": day(true),
        "tuesday": day(true),
        "wednesday": day(true),
        "thursday": day(true),
        "friday": day(true),
        "saturday": day(false),
        "sunday": day(false),
    });
    serde_json::to_string(&hours.to_string()).unwrap()
}

pub struct Fixture {
    pub persistence: SqlitePersistence,
    pub salon: Salon,
    pub service: Service,
    pub alice: Employee,
    pub bob: Employee,
}

pub fn create_test_fixture() -> Fixture {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    seed(&mut persistence);
    let salon: Salon = persistence.get_salon(1).unwrap();
    let service: Service = persistence.get_service(1).unwrap();
    let alice: Employee = persistence.get_employee(1).unwrap();
    let bob: Employee = persistence.get_employee(2).unwrap();
    Fixture {
        persistence,
        salon,
        service,
        alice,
        bob,
    }
}

/// Seeds a salon with a 60 minute service and two stylists.
pub fn seed(persistence: &mut SqlitePersistence) {
    let hours: String = create_test_hours();
    let salon: Salon = persistence
        .create_salon("Main Street", &SalonTimezone::utc(), Some(&hours))
        .unwrap();
    persistence
        .create_service(salon.salon_id, "Haircut", DurationMinutes::new(60).unwrap())
        .unwrap();
    persistence.create_employee(salon.salon_id, "Alice").unwrap();
    persistence.create_employee(salon.salon_id, "Bob").unwrap();
}

pub fn create_test_request(
    service: &Service,
    employee_id: Option<i64>,
    start: PrimitiveDateTime,
) -> BookingRequest {
    let assignment_mode: AssignmentMode = if employee_id.is_some() {
        AssignmentMode::Specific
    } else {
        AssignmentMode::Any
    };
    BookingRequest {
        employee_id,
        service_id: service.service_id,
        scheduled_start: start,
        scheduled_end: start + service.duration.as_duration(),
        customer_id: 700,
        assignment_mode,
    }
}
