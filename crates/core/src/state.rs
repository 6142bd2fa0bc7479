// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validator::{Rejection, ValidationOutcome};
use salon_booking_domain::{Appointment, AssignmentMode, BookingRequest, Service};
use time::PrimitiveDateTime;

/// The customer's selections before submission.
///
/// Steps are service, then employee (or "any"), then date and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    /// The customer making the booking.
    pub customer_id: i64,
    /// The chosen service.
    pub service: Service,
    /// Whether a specific employee was picked.
    pub assignment_mode: AssignmentMode,
    /// The picked employee, when `assignment_mode` is `Specific`.
    pub employee_id: Option<i64>,
    /// The picked salon-local start time.
    pub scheduled_start: Option<PrimitiveDateTime>,
}

impl BookingDraft {
    /// Starts a draft for a service with "any available" selected.
    #[must_use]
    pub const fn new(customer_id: i64, service: Service) -> Self {
        Self {
            customer_id,
            service,
            assignment_mode: AssignmentMode::Any,
            employee_id: None,
            scheduled_start: None,
        }
    }

    /// Builds the request this draft describes, once a start time is chosen.
    ///
    /// The end is always the start plus the service duration.
    #[must_use]
    pub fn to_request(&self) -> Option<BookingRequest> {
        let scheduled_start: PrimitiveDateTime = self.scheduled_start?;
        let scheduled_end: PrimitiveDateTime =
            scheduled_start.checked_add(self.service.duration.as_duration())?;
        Some(BookingRequest {
            employee_id: self.employee_id,
            service_id: self.service.service_id,
            scheduled_start,
            scheduled_end,
            customer_id: self.customer_id,
            assignment_mode: self.assignment_mode,
        })
    }
}

/// Where a booking attempt stands.
///
/// States are immutable values; [`crate::apply`] consumes one and returns the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingState {
    /// Selections in progress.
    Draft(BookingDraft),
    /// Submitted, awaiting the validator.
    PendingValidation {
        /// The selections that produced the request.
        draft: BookingDraft,
        /// The request under validation.
        request: BookingRequest,
    },
    /// Passed validation. Advisory only; not a reservation.
    Accepted {
        /// The selections that produced the request.
        draft: BookingDraft,
        /// The request to commit.
        request: BookingRequest,
    },
    /// Failed validation or lost the commit race.
    Rejected {
        /// The selections that produced the request.
        draft: BookingDraft,
        /// Why the booking was refused.
        rejection: Rejection,
    },
    /// Written to the ledger.
    Committed {
        /// The stored appointment.
        appointment: Appointment,
    },
}

impl BookingState {
    /// Starts a new booking.
    #[must_use]
    pub const fn start(customer_id: i64, service: Service) -> Self {
        Self::Draft(BookingDraft::new(customer_id, service))
    }

    /// Returns a stable name for this state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Draft(_) => "draft",
            Self::PendingValidation { .. } => "pending_validation",
            Self::Accepted { .. } => "accepted",
            Self::Rejected { .. } => "rejected",
            Self::Committed { .. } => "committed",
        }
    }

    /// Returns whether the booking reached the ledger.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// An input that moves a booking between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    /// Pick a specific employee.
    ChooseEmployee(i64),
    /// Accept any available employee.
    ChooseAnyEmployee,
    /// Pick a salon-local start time.
    ChooseStart(PrimitiveDateTime),
    /// Submit the draft for validation.
    Submit,
    /// The validator answered.
    Validated(ValidationOutcome),
    /// The ledger stored the appointment.
    Committed(Appointment),
    /// The ledger refused the commit.
    CommitRejected(Rejection),
    /// Return to the draft to pick another slot.
    Reselect,
}

impl BookingEvent {
    /// Returns a stable name for this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ChooseEmployee(_) => "choose_employee",
            Self::ChooseAnyEmployee => "choose_any_employee",
            Self::ChooseStart(_) => "choose_start",
            Self::Submit => "submit",
            Self::Validated(_) => "validated",
            Self::Committed(_) => "committed",
            Self::CommitRejected(_) => "commit_rejected",
            Self::Reselect => "reselect",
        }
    }
}
