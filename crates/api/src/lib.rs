// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the salon booking engine.
//!
//! Handlers take wire DTOs, parse them into engine types, run the core rules
//! against the `SQLite` ledger and return wire DTOs. Every failure leaves this
//! crate as an [`ApiError`] with a stable [`ErrorCode`].

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, ErrorCode, translate_core_error, translate_domain_error, translate_ledger_error,
    translate_persistence_error, translate_rejection,
};
pub use handlers::{
    cancel_appointment, create_appointment, create_employee, create_salon, create_service,
    get_employee_availability, get_employee_slots, get_operating_hours, get_salon_availability,
    get_salon_slots, validate_booking,
};
pub use request_response::{
    AppointmentInfo, AppointmentResponse, AvailabilityQuery, AvailabilityResponse,
    BookingRequestBody, CreateEmployeeRequest, CreateEmployeeResponse, CreateSalonRequest,
    CreateSalonResponse, CreateServiceRequest, CreateServiceResponse, OperatingHoursResponse,
    SlotsQuery, SlotsResponse, TimeSlotInfo, ValidateBookingResponse, slots_to_info,
};
