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

mod availability;
mod clock;
mod error;
pub mod format;
mod operating_hours;
mod slots;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::{
    DEFAULT_RANGE_DAYS, DateRange, DayAvailability, DayStatus, MAX_RANGE_DAYS,
    any_available_availability, summarize_slots, window_slot_count,
};
pub use clock::SalonTimezone;
pub use error::DomainError;
pub use operating_hours::{
    DayHours, HoursEncoding, HoursResolution, MAX_DECODE_DEPTH, OperatingHours,
    resolve_operating_hours, resolve_stored_operating_hours,
};
pub use slots::{
    SLOT_INTERVAL_MINUTES, SlotUnavailableReason, TimeSlot, employee_time_slots, generate_slots,
    generate_slots_for_date, mark_booked_slots, minutes_since_midnight, time_from_minutes,
};
pub use types::{
    Appointment, AppointmentStatus, AssignmentMode, BookingRequest, BookingWindow,
    DurationMinutes, Employee, Salon, Service,
};
pub use validation::{validate_name, validate_timezone_or_default};
