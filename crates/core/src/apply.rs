// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::state::{BookingDraft, BookingEvent, BookingState};
use crate::validator::ValidationOutcome;
use salon_booking_domain::{AssignmentMode, BookingRequest};

/// Applies an event to a booking, producing the next state.
///
/// Transitions are pure and consume the input state. A refused event
/// returns an error and the consumed state is dropped; callers that want to
/// stay in the current state on refusal apply the event to a clone.
///
/// # Arguments
///
/// * `state` - The current booking state
/// * `event` - The event to apply
///
/// # Returns
///
/// * `Ok(BookingState)` with the next state
/// * `Err(CoreError::InvalidTransition)` if the state does not accept the event
///
/// # Errors
///
/// Returns an error if:
/// - The event is not valid in the current state
/// - A draft is submitted before a start time is chosen
pub fn apply(state: BookingState, event: BookingEvent) -> Result<BookingState, CoreError> {
    match (state, event) {
        (BookingState::Draft(mut draft), BookingEvent::ChooseEmployee(employee_id)) => {
            draft.assignment_mode = AssignmentMode::Specific;
            draft.employee_id = Some(employee_id);
            Ok(BookingState::Draft(draft))
        }
        (BookingState::Draft(mut draft), BookingEvent::ChooseAnyEmployee) => {
            draft.assignment_mode = AssignmentMode::Any;
            draft.employee_id = None;
            Ok(BookingState::Draft(draft))
        }
        (BookingState::Draft(mut draft), BookingEvent::ChooseStart(start)) => {
            draft.scheduled_start = Some(start);
            Ok(BookingState::Draft(draft))
        }
        (BookingState::Draft(draft), BookingEvent::Submit) => {
            let request: BookingRequest =
                draft.to_request().ok_or(CoreError::IncompleteBooking {
                    missing: "start time",
                })?;
            Ok(BookingState::PendingValidation { draft, request })
        }
        (BookingState::PendingValidation { draft, request }, BookingEvent::Validated(outcome)) => {
            Ok(match outcome {
                ValidationOutcome::Accepted => BookingState::Accepted { draft, request },
                ValidationOutcome::Rejected(rejection) => {
                    BookingState::Rejected { draft, rejection }
                }
            })
        }
        (BookingState::Accepted { .. }, BookingEvent::Committed(appointment)) => {
            Ok(BookingState::Committed { appointment })
        }
        (BookingState::Accepted { draft, .. }, BookingEvent::CommitRejected(rejection)) => {
            Ok(BookingState::Rejected { draft, rejection })
        }
        (BookingState::Rejected { draft, .. }, BookingEvent::Reselect) => {
            Ok(BookingState::Draft(reselect(draft)))
        }
        (state, event) => Err(CoreError::InvalidTransition {
            state: state.name(),
            event: event.name(),
        }),
    }
}

/// Keeps the service and employee choice, clears the time.
const fn reselect(mut draft: BookingDraft) -> BookingDraft {
    draft.scheduled_start = None;
    draft
}
