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

mod apply;
mod availability;
mod context;
mod error;
mod ledger;
mod state;
mod validator;

#[cfg(test)]
mod tests;

use salon_booking_domain::{Appointment, AssignmentMode, BookingRequest};
use time::Date;

// Re-export public types and functions
pub use apply::apply;
pub use availability::{
    any_available_availability, any_available_slots, employee_availability, employee_time_slots,
    resolve_salon_hours,
};
pub use context::BookingContext;
pub use error::CoreError;
pub use ledger::{BookingLedger, LedgerError};
pub use state::{BookingDraft, BookingEvent, BookingState};
pub use validator::{
    Rejection, RejectionKind, ValidationOutcome, check_overlap, validate_booking,
};

/// Advisory validation of a booking request against a fresh ledger snapshot.
///
/// No lock is held afterwards: an `Accepted` outcome can still lose at commit.
///
/// # Arguments
///
/// * `ledger` - The appointment ledger
/// * `context` - The request context; its service must match the request
/// * `request` - The booking to validate
///
/// # Returns
///
/// The validation outcome. Rule failures are outcomes, not errors.
///
/// # Errors
///
/// Returns an error if a specific employee is missing or inactive, or if the
/// ledger cannot be read.
pub fn validate_with_ledger<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    request: &BookingRequest,
) -> Result<ValidationOutcome, CoreError> {
    let mut existing: Vec<Appointment> = Vec::new();

    if let (AssignmentMode::Specific, Some(employee_id)) =
        (request.assignment_mode, request.employee_id)
    {
        let salon_id: i64 = ledger.active_employee(employee_id)?.salon_id;
        if salon_id != context.salon().salon_id {
            return Ok(ValidationOutcome::Rejected(Rejection::new(
                RejectionKind::MalformedRequest,
                format!(
                    "Employee {employee_id} does not work at salon {}",
                    context.salon().salon_id
                ),
            )));
        }
        for date in window_dates(request) {
            existing.extend(ledger.appointments_for_employee(employee_id, date)?);
        }
    }

    Ok(validate_booking(
        request,
        context.service(),
        &existing,
        context.now(),
    ))
}

/// Commits a booking through the ledger.
///
/// # Errors
///
/// Returns `CoreError::Ledger` with `LedgerError::Conflict` when the window
/// was taken between validation and commit.
pub fn commit_booking<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    request: &BookingRequest,
) -> Result<Appointment, CoreError> {
    Ok(ledger.create_appointment(request, context.now())?)
}

/// Runs the validator for a booking awaiting validation.
///
/// # Errors
///
/// Returns an error if the state is not `PendingValidation` or the ledger fails.
pub fn validate_pending<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    state: BookingState,
) -> Result<BookingState, CoreError> {
    let BookingState::PendingValidation { request, .. } = &state else {
        return Err(CoreError::InvalidTransition {
            state: state.name(),
            event: "validated",
        });
    };
    let outcome: ValidationOutcome = validate_with_ledger(ledger, context, request)?;
    apply(state, BookingEvent::Validated(outcome))
}

/// Commits an accepted booking, turning a lost race into `Rejected`.
///
/// # Errors
///
/// Returns an error if the state is not `Accepted`, or the ledger fails for a
/// reason other than refusing the booking.
pub fn commit_accepted<L: BookingLedger + ?Sized>(
    ledger: &mut L,
    context: &BookingContext,
    state: BookingState,
) -> Result<BookingState, CoreError> {
    let BookingState::Accepted { request, .. } = &state else {
        return Err(CoreError::InvalidTransition {
            state: state.name(),
            event: "committed",
        });
    };
    match ledger.create_appointment(request, context.now()) {
        Ok(appointment) => apply(state, BookingEvent::Committed(appointment)),
        Err(err) => match err.as_rejection() {
            Some(rejection) => apply(state, BookingEvent::CommitRejected(rejection)),
            None => Err(CoreError::Ledger(err)),
        },
    }
}

/// The local dates a request window touches.
fn window_dates(request: &BookingRequest) -> Vec<Date> {
    let start: Date = request.scheduled_start.date();
    let end: Date = request.scheduled_end.date();
    if end > start { vec![start, end] } else { vec![start] }
}
