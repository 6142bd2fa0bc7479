// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use salon_booking_persistence::SqlitePersistence;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    BookingRequestBody, CreateEmployeeRequest, CreateSalonRequest, CreateServiceRequest,
    create_employee, create_salon, create_service,
};

/// Monday 2026-03-02, before opening, in UTC.
pub const NOW: OffsetDateTime = datetime!(2026-03-02 08:00 UTC);

/// Weekdays 09:00-17:00, closed weekends.
pub fn weekday_hours() -> Value {
    let day = |open: bool| json!({"isOpen": open, "startTime": "09:00", "endTime": "17:00"});
    json!({
        "monday": day(true),
        "tuesday": day(true),
        "wednesday": day(true),
        "thursday": day(true),
        "friday": day(true),
        "saturday": day(false),
        "sunday": day(false),
    })
}

pub struct Fixture {
    pub persistence: SqlitePersistence,
    pub salon_id: i64,
    pub service_id: i64,
    pub alice: i64,
    pub bob: i64,
}

/// A UTC salon with a 60 minute service and two stylists.
pub fn create_test_fixture() -> Fixture {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let salon_id: i64 = create_salon(
        &mut persistence,
        &CreateSalonRequest {
            name: String::from("Main Street"),
            timezone: None,
            operating_hours: Some(weekday_hours()),
        },
    )
    .unwrap()
    .salon_id;
    let service_id: i64 = create_service(
        &mut persistence,
        &CreateServiceRequest {
            salon_id,
            name: String::from("Haircut"),
            duration_minutes: 60,
        },
    )
    .unwrap()
    .service_id;
    let alice: i64 = create_test_employee(&mut persistence, salon_id, "Alice");
    let bob: i64 = create_test_employee(&mut persistence, salon_id, "Bob");

    Fixture {
        persistence,
        salon_id,
        service_id,
        alice,
        bob,
    }
}

pub fn create_test_employee(persistence: &mut SqlitePersistence, salon_id: i64, name: &str) -> i64 {
    create_employee(
        persistence,
        &CreateEmployeeRequest {
            salon_id,
            name: name.to_string(),
        },
    )
    .unwrap()
    .employee_id
}

pub fn create_test_body(service_id: i64, employee_id: Option<i64>, start: &str) -> BookingRequestBody {
    BookingRequestBody {
        service_id,
        employee_id,
        customer_id: 700,
        assignment_mode: String::from(if employee_id.is_some() { "specific" } else { "any" }),
        scheduled_start: start.to_string(),
        scheduled_end: None,
    }
}
