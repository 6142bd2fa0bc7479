// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use salon_booking::{CoreError, LedgerError, Rejection, RejectionKind};
use salon_booking_domain::DomainError;
use salon_booking_persistence::PersistenceError;

use crate::{
    ApiError, ErrorCode, translate_core_error, translate_domain_error,
    translate_persistence_error, translate_rejection,
};

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ErrorCode::SlotConflict.as_str(), "slot_conflict");
    assert_eq!(ErrorCode::PastTime.as_str(), "past_time");
    assert_eq!(ErrorCode::MalformedRequest.as_str(), "malformed_request");
    assert_eq!(ErrorCode::InvalidInput.as_str(), "invalid_input");
    assert_eq!(ErrorCode::NotFound.as_str(), "not_found");
    assert_eq!(ErrorCode::Internal.as_str(), "internal");
    assert_eq!(
        serde_json::to_string(&ErrorCode::SlotConflict).unwrap(),
        "\"slot_conflict\""
    );
}

#[test]
fn test_rejection_kinds_map_to_codes() {
    let cases = [
        (RejectionKind::PastTime, ErrorCode::PastTime),
        (RejectionKind::OverlapConflict, ErrorCode::SlotConflict),
        (RejectionKind::MalformedRequest, ErrorCode::MalformedRequest),
    ];
    for (kind, code) in cases {
        assert_eq!(translate_rejection(Rejection::new(kind, "reason")).code(), code);
    }
}

#[test]
fn test_conflict_keeps_caller_displayable_message() {
    let err: ApiError = translate_core_error(CoreError::Ledger(LedgerError::Conflict {
        reason: String::from("This time slot is no longer available"),
    }));
    assert_eq!(err.code(), ErrorCode::SlotConflict);
    assert_eq!(err.to_string(), "This time slot is no longer available");
}

#[test]
fn test_persistence_conflict_is_slot_conflict() {
    let err: ApiError = translate_persistence_error(PersistenceError::AppointmentConflict {
        employee_id: Some(3),
        reason: String::from("taken"),
    });
    assert_eq!(
        err,
        ApiError::SlotConflict {
            message: String::from("taken")
        }
    );
}

#[test]
fn test_missing_rows_are_not_found() {
    let err: ApiError = translate_persistence_error(PersistenceError::AppointmentNotFound(9));
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.to_string(), "Appointment not found: Appointment 9 does not exist");
}

#[test]
fn test_domain_errors_name_the_field() {
    let err: ApiError = translate_domain_error(DomainError::InvalidTimezone(String::from("Mars/Base")));
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "timezone"));

    let err: ApiError = translate_domain_error(DomainError::InvalidDuration { minutes: 0 });
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "duration_minutes"));
}

#[test]
fn test_storage_failures_are_internal() {
    let err: ApiError =
        translate_persistence_error(PersistenceError::DatabaseError(String::from("disk I/O")));
    assert_eq!(err.code(), ErrorCode::Internal);
}
