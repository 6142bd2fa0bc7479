// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking conflict validation.
//!
//! Rules are evaluated in order and the first failure wins:
//!
//! 1. A `specific` booking names an employee and does not overlap any of that
//!    employee's pending or confirmed appointments.
//! 2. The requested start is not before "now" (both modes). For `any` this is
//!    the only ledger-independent check; employee overlap is resolved at commit.
//! 3. The window is well formed and exactly as long as the service duration.
//!
//! An `Accepted` outcome is advisory. The ledger repeats the overlap check
//! inside its commit.

use salon_booking_domain::{
    Appointment, AssignmentMode, BookingRequest, BookingWindow, Service,
};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// Category of a rejected booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The booking starts before the salon-local current time.
    PastTime,
    /// The window collides with an existing appointment.
    OverlapConflict,
    /// Missing fields or a window that disagrees with the service.
    MalformedRequest,
}

impl RejectionKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PastTime => "past_time",
            Self::OverlapConflict => "overlap_conflict",
            Self::MalformedRequest => "malformed_request",
        }
    }
}

/// A rejected booking with a caller-displayable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// What kind of rule failed.
    pub kind: RejectionKind,
    /// Message suitable for showing to the customer.
    pub reason: String,
}

impl Rejection {
    /// Creates a new rejection.
    #[must_use]
    pub fn new(kind: RejectionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// The standard overlap rejection shown when a slot was taken.
    #[must_use]
    pub fn slot_taken() -> Self {
        Self::new(
            RejectionKind::OverlapConflict,
            "This time slot is no longer available",
        )
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.reason, self.kind.as_str())
    }
}

/// Result of validating a booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every rule passed.
    Accepted,
    /// The first failing rule.
    Rejected(Rejection),
}

impl ValidationOutcome {
    /// Returns whether the request was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the rejection, if any.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<Result<(), Rejection>> for ValidationOutcome {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Self::Accepted,
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}

/// Validates a booking request against a ledger snapshot.
///
/// # Arguments
///
/// * `request` - The booking being attempted
/// * `service` - The service named by the request
/// * `existing` - Appointments covering the requested window; only those for
///   the requested employee are considered
/// * `now` - The salon-local current time
///
/// # Returns
///
/// `Accepted`, or `Rejected` with the first failing rule.
#[must_use]
pub fn validate_booking(
    request: &BookingRequest,
    service: &Service,
    existing: &[Appointment],
    now: PrimitiveDateTime,
) -> ValidationOutcome {
    check_booking(request, service, existing, now).into()
}

fn check_booking(
    request: &BookingRequest,
    service: &Service,
    existing: &[Appointment],
    now: PrimitiveDateTime,
) -> Result<(), Rejection> {
    if request.assignment_mode == AssignmentMode::Specific {
        let employee_id: i64 = request.employee_id.ok_or_else(|| {
            Rejection::new(
                RejectionKind::MalformedRequest,
                "An employee must be selected for a specific booking",
            )
        })?;
        check_overlap(employee_id, &request.window(), existing)?;
    }
    check_not_past(request, now)?;
    check_window(request, service)
}

/// Rejects the window if any blocking appointment of the employee overlaps it.
///
/// # Errors
///
/// Returns an `OverlapConflict` rejection on the first collision.
pub fn check_overlap(
    employee_id: i64,
    window: &BookingWindow,
    existing: &[Appointment],
) -> Result<(), Rejection> {
    if existing
        .iter()
        .filter(|appointment| appointment.employee_id == Some(employee_id))
        .any(|appointment| appointment.blocks(window))
    {
        return Err(Rejection::slot_taken());
    }
    Ok(())
}

fn check_not_past(request: &BookingRequest, now: PrimitiveDateTime) -> Result<(), Rejection> {
    if request.scheduled_start < now {
        return Err(Rejection::new(
            RejectionKind::PastTime,
            "Cannot book a time in the past",
        ));
    }
    Ok(())
}

fn check_window(request: &BookingRequest, service: &Service) -> Result<(), Rejection> {
    if request.service_id != service.service_id {
        return Err(Rejection::new(
            RejectionKind::MalformedRequest,
            format!(
                "Request names service {} but was checked against service {}",
                request.service_id, service.service_id
            ),
        ));
    }
    if !service.is_active {
        return Err(Rejection::new(
            RejectionKind::MalformedRequest,
            "This service is not currently bookable",
        ));
    }

    let window: BookingWindow = request.window();
    if !window.is_well_formed() {
        return Err(Rejection::new(
            RejectionKind::MalformedRequest,
            "Appointment end must be after its start",
        ));
    }
    if window.length() != service.duration.as_duration() {
        return Err(Rejection::new(
            RejectionKind::MalformedRequest,
            format!(
                "Appointment length of {} minutes does not match the {} minute service",
                window.length().whole_minutes(),
                service.duration.get()
            ),
        ));
    }
    Ok(())
}
