// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD`, times as `HH:MM` and appointment datetimes
//! as `YYYY-MM-DDTHH:MM`, all in salon-local time. Request fields stay as
//! strings here and are parsed by the handlers so a bad value becomes an
//! `invalid_input` error naming the field.

use salon_booking_domain::format::{hhmm, local_date, local_datetime};
use salon_booking_domain::{
    Appointment, DayAvailability, HoursEncoding, OperatingHours, TimeSlot,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, PrimitiveDateTime, Time};

use crate::error::ErrorCode;

/// API request to create a salon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSalonRequest {
    /// Display name.
    pub name: String,
    /// IANA timezone name. Defaults to UTC.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Operating hours in any supported encoding: a per-weekday object, that
    /// object as JSON text, or a `"HH:MM-HH:MM"` range.
    #[serde(default)]
    pub operating_hours: Option<Value>,
}

/// API response for a successful salon creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSalonResponse {
    /// The canonical salon identifier.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// The timezone actually stored.
    pub timezone: String,
    /// Whether the supplied hours could be read in a known encoding.
    pub hours_configured: bool,
    /// A success message.
    pub message: String,
}

/// API request to create a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    /// The salon offering the service.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// Length of one booking in minutes.
    pub duration_minutes: u16,
}

/// API response for a successful service creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceResponse {
    /// The canonical service identifier.
    pub service_id: i64,
    /// The salon offering the service.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// Length of one booking in minutes.
    pub duration_minutes: u16,
    /// A success message.
    pub message: String,
}

/// API request to create an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    /// The salon the employee works at.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
}

/// API response for a successful employee creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeResponse {
    /// The canonical employee identifier.
    pub employee_id: i64,
    /// The salon the employee works at.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// API response describing a salon's resolved operating hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHoursResponse {
    /// The salon.
    pub salon_id: i64,
    /// False when no encoding matched and the default window is in effect.
    pub configured: bool,
    /// The encoding that matched, when one did.
    pub encoding: Option<HoursEncoding>,
    /// The hours in effect.
    pub hours: OperatingHours,
}

/// Query for a range of day summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// The service to size slots for.
    pub service_id: i64,
    /// First date, `YYYY-MM-DD`. Defaults to today.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last date, inclusive. Defaults to 30 days after the start.
    #[serde(default)]
    pub end_date: Option<String>,
}

/// API response for a range of day summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// The salon the summaries are for.
    pub salon_id: i64,
    /// Set when the summaries are for one employee.
    pub employee_id: Option<i64>,
    /// The service the slots were sized for.
    pub service_id: i64,
    /// First date of the range.
    #[serde(with = "local_date")]
    pub start_date: Date,
    /// Last date of the range, inclusive.
    #[serde(with = "local_date")]
    pub end_date: Date,
    /// One summary per date, in order.
    pub days: Vec<DayAvailability>,
}

/// Query for one day's slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsQuery {
    /// The service to size slots for.
    pub service_id: i64,
    /// The date, `YYYY-MM-DD`.
    pub date: String,
}

/// One slot as shown to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotInfo {
    /// Local start.
    #[serde(with = "hhmm")]
    pub start_time: Time,
    /// Local end.
    #[serde(with = "hhmm")]
    pub end_time: Time,
    /// Whether the slot can be booked.
    pub available: bool,
    /// Why not, e.g. `"Already booked"`.
    pub reason: Option<String>,
}

/// API response for one day's slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsResponse {
    /// The salon.
    pub salon_id: i64,
    /// Set when the slots are for one employee.
    pub employee_id: Option<i64>,
    /// The service the slots were sized for.
    pub service_id: i64,
    /// The date.
    #[serde(with = "local_date")]
    pub date: Date,
    /// Slots in ascending start order.
    pub slots: Vec<TimeSlotInfo>,
}

/// A booking attempt, used for both validation and commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequestBody {
    /// The service to book.
    pub service_id: i64,
    /// The requested employee. Required when `assignment_mode` is `specific`.
    #[serde(default)]
    pub employee_id: Option<i64>,
    /// The customer making the booking.
    pub customer_id: i64,
    /// `specific` or `any`.
    pub assignment_mode: String,
    /// Requested local start, `YYYY-MM-DDTHH:MM`.
    pub scheduled_start: String,
    /// Requested local end. Defaults to the start plus the service duration.
    #[serde(default)]
    pub scheduled_end: Option<String>,
}

/// API response for an advisory validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateBookingResponse {
    /// Whether the booking passed every check.
    pub valid: bool,
    /// Why not, when it did not.
    pub reason: Option<String>,
    /// The error code the same failure would carry at commit.
    pub error: Option<ErrorCode>,
}

/// Appointment details returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentInfo {
    /// The canonical appointment identifier.
    pub appointment_id: i64,
    /// The salon.
    pub salon_id: i64,
    /// The assigned employee.
    pub employee_id: Option<i64>,
    /// The booked service.
    pub service_id: i64,
    /// The customer.
    pub customer_id: i64,
    /// Local start.
    #[serde(with = "local_datetime")]
    pub scheduled_start: PrimitiveDateTime,
    /// Local end.
    #[serde(with = "local_datetime")]
    pub scheduled_end: PrimitiveDateTime,
    /// `pending`, `confirmed`, `cancelled` or `completed`.
    pub status: String,
}

impl From<Appointment> for AppointmentInfo {
    fn from(appointment: Appointment) -> Self {
        Self {
            appointment_id: appointment.appointment_id,
            salon_id: appointment.salon_id,
            employee_id: appointment.employee_id,
            service_id: appointment.service_id,
            customer_id: appointment.customer_id,
            scheduled_start: appointment.scheduled_start,
            scheduled_end: appointment.scheduled_end,
            status: appointment.status.as_str().to_string(),
        }
    }
}

/// API response for a committed or cancelled appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    /// The appointment after the operation.
    pub appointment: AppointmentInfo,
    /// A success message.
    pub message: String,
}

/// Converts generated slots for the wire.
#[must_use]
pub fn slots_to_info(slots: &[TimeSlot]) -> Vec<TimeSlotInfo> {
    slots
        .iter()
        .map(|slot| TimeSlotInfo {
            start_time: slot.start_time,
            end_time: slot.end_time,
            available: slot.available,
            reason: slot.reason.map(|reason| reason.message().to_string()),
        })
        .collect()
}
