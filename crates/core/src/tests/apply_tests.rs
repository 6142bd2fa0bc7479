// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{ALICE, SALON_ID, create_test_service};
use crate::{
    BookingEvent, BookingState, CoreError, Rejection, RejectionKind, ValidationOutcome, apply,
};
use salon_booking_domain::{Appointment, AppointmentStatus, AssignmentMode};
use time::macros::datetime;

fn draft_with_start() -> BookingState {
    let state: BookingState = BookingState::start(500, create_test_service(45));
    let state: BookingState = apply(state, BookingEvent::ChooseEmployee(ALICE)).unwrap();
    apply(
        state,
        BookingEvent::ChooseStart(datetime!(2026-03-02 10:00)),
    )
    .unwrap()
}

fn committed_appointment() -> Appointment {
    Appointment {
        appointment_id: 1,
        salon_id: SALON_ID,
        employee_id: Some(ALICE),
        service_id: 10,
        customer_id: 500,
        scheduled_start: datetime!(2026-03-02 10:00),
        scheduled_end: datetime!(2026-03-02 10:45),
        status: AppointmentStatus::Pending,
    }
}

#[test]
fn test_new_booking_starts_as_any_available_draft() {
    let BookingState::Draft(draft) = BookingState::start(500, create_test_service(45)) else {
        panic!("expected draft");
    };
    assert_eq!(draft.assignment_mode, AssignmentMode::Any);
    assert_eq!(draft.employee_id, None);
    assert_eq!(draft.scheduled_start, None);
}

#[test]
fn test_submit_derives_end_from_service_duration() {
    let state: BookingState = apply(draft_with_start(), BookingEvent::Submit).unwrap();
    let BookingState::PendingValidation { request, .. } = state else {
        panic!("expected pending validation");
    };
    assert_eq!(request.scheduled_end, datetime!(2026-03-02 10:45));
    assert_eq!(request.employee_id, Some(ALICE));
    assert_eq!(request.assignment_mode, AssignmentMode::Specific);
}

#[test]
fn test_submit_without_start_is_incomplete() {
    let state: BookingState = BookingState::start(500, create_test_service(45));
    let result = apply(state, BookingEvent::Submit);
    assert_eq!(
        result,
        Err(CoreError::IncompleteBooking {
            missing: "start time"
        })
    );
}

#[test]
fn test_choose_any_clears_employee() {
    let state: BookingState = apply(draft_with_start(), BookingEvent::ChooseAnyEmployee).unwrap();
    let BookingState::Draft(draft) = state else {
        panic!("expected draft");
    };
    assert_eq!(draft.assignment_mode, AssignmentMode::Any);
    assert_eq!(draft.employee_id, None);
}

#[test]
fn test_full_happy_path() {
    let state: BookingState = apply(draft_with_start(), BookingEvent::Submit).unwrap();
    let state: BookingState =
        apply(state, BookingEvent::Validated(ValidationOutcome::Accepted)).unwrap();
    assert_eq!(state.name(), "accepted");
    let state: BookingState =
        apply(state, BookingEvent::Committed(committed_appointment())).unwrap();
    assert!(state.is_committed());
}

#[test]
fn test_rejection_then_reselect_keeps_service_and_employee() {
    let state: BookingState = apply(draft_with_start(), BookingEvent::Submit).unwrap();
    let state: BookingState = apply(
        state,
        BookingEvent::Validated(ValidationOutcome::Rejected(Rejection::slot_taken())),
    )
    .unwrap();
    assert_eq!(state.name(), "rejected");

    let BookingState::Draft(draft) = apply(state, BookingEvent::Reselect).unwrap() else {
        panic!("expected draft");
    };
    assert_eq!(draft.employee_id, Some(ALICE));
    assert_eq!(draft.service.duration.get(), 45);
    assert_eq!(draft.scheduled_start, None);
}

#[test]
fn test_lost_commit_race_becomes_rejected() {
    let state: BookingState = apply(draft_with_start(), BookingEvent::Submit).unwrap();
    let state: BookingState =
        apply(state, BookingEvent::Validated(ValidationOutcome::Accepted)).unwrap();
    let state: BookingState =
        apply(state, BookingEvent::CommitRejected(Rejection::slot_taken())).unwrap();
    let BookingState::Rejected { rejection, .. } = state else {
        panic!("expected rejected");
    };
    assert_eq!(rejection.kind, RejectionKind::OverlapConflict);
}

#[test]
fn test_invalid_transitions_are_refused() {
    let draft: BookingState = draft_with_start();
    assert_eq!(
        apply(
            draft.clone(),
            BookingEvent::Committed(committed_appointment())
        ),
        Err(CoreError::InvalidTransition {
            state: "draft",
            event: "committed",
        })
    );

    let committed: BookingState = BookingState::Committed {
        appointment: committed_appointment(),
    };
    assert_eq!(
        apply(committed, BookingEvent::Reselect),
        Err(CoreError::InvalidTransition {
            state: "committed",
            event: "reselect",
        })
    );

    let pending: BookingState = apply(draft, BookingEvent::Submit).unwrap();
    assert!(matches!(
        apply(pending, BookingEvent::ChooseStart(datetime!(2026-03-02 11:00))),
        Err(CoreError::InvalidTransition {
            state: "pending_validation",
            ..
        })
    ));
}

#[test]
fn test_refused_event_leaves_cloned_state_usable() {
    let current: BookingState = BookingState::start(500, create_test_service(45));

    assert_eq!(
        apply(current.clone(), BookingEvent::Submit),
        Err(CoreError::IncompleteBooking {
            missing: "start time"
        })
    );
    assert!(apply(current.clone(), BookingEvent::Reselect).is_err());

    let next: BookingState = apply(
        current,
        BookingEvent::ChooseStart(datetime!(2026-03-02 10:00)),
    )
    .unwrap();
    assert!(matches!(
        apply(next, BookingEvent::Submit),
        Ok(BookingState::PendingValidation { .. })
    ));
}
