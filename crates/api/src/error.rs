// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every error carries a stable [`ErrorCode`]. Clients branch on the code,
//! never on the message text: a `slot_conflict` means the caller must refresh
//! its slot view before trying again.

use salon_booking::{CoreError, LedgerError, Rejection, RejectionKind};
use salon_booking_domain::DomainError;
use salon_booking_persistence::PersistenceError;
use thiserror::Error;

/// Machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The window was taken by another booking. Refresh and reselect.
    SlotConflict,
    /// The requested start is before the salon-local current time.
    PastTime,
    /// The booking is inconsistent with the service, likely a stale client.
    MalformedRequest,
    /// A field failed validation.
    InvalidInput,
    /// A referenced resource does not exist.
    NotFound,
    /// Something went wrong on our side.
    Internal,
}

impl ErrorCode {
    /// Converts this code to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SlotConflict => "slot_conflict",
            Self::PastTime => "past_time",
            Self::MalformedRequest => "malformed_request",
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The commit lost to an overlapping appointment.
    #[error("{message}")]
    SlotConflict {
        /// Caller-displayable reason.
        message: String,
    },
    /// The booking starts in the past.
    #[error("{message}")]
    PastTime {
        /// Caller-displayable reason.
        message: String,
    },
    /// The booking does not match the service or is missing a selection.
    #[error("Malformed booking request: {message}")]
    MalformedRequest {
        /// Caller-displayable reason.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SlotConflict { .. } => ErrorCode::SlotConflict,
            Self::PastTime { .. } => ErrorCode::PastTime,
            Self::MalformedRequest { .. } => ErrorCode::MalformedRequest,
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::ResourceNotFound { .. } => ErrorCode::NotFound,
            Self::Internal { .. } => ErrorCode::Internal,
        }
    }
}

/// Translates a validator rejection into an API error.
#[must_use]
pub fn translate_rejection(rejection: Rejection) -> ApiError {
    match rejection.kind {
        RejectionKind::PastTime => ApiError::PastTime {
            message: rejection.reason,
        },
        RejectionKind::OverlapConflict => ApiError::SlotConflict {
            message: rejection.reason,
        },
        RejectionKind::MalformedRequest => ApiError::MalformedRequest {
            message: rejection.reason,
        },
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    let field: &str = match err {
        DomainError::InvalidDuration { .. } => "duration_minutes",
        DomainError::InvalidDateRange { .. } => "end_date",
        DomainError::InvalidTimezone(_) => "timezone",
        DomainError::DateParseError { .. } => "date",
        DomainError::TimeParseError { .. } => "time",
        DomainError::DateTimeParseError { .. } => "scheduled_start",
        DomainError::InvalidAppointmentStatus(_) => "status",
        DomainError::InvalidAssignmentMode(_) => "assignment_mode",
        DomainError::InvalidName(_) => "name",
        DomainError::FormatError(_) | DomainError::DateArithmeticOverflow { .. } => {
            return ApiError::Internal { message };
        }
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

/// Translates a ledger error into an API error.
#[must_use]
pub fn translate_ledger_error(err: LedgerError) -> ApiError {
    match err {
        LedgerError::Conflict { reason } => ApiError::SlotConflict { message: reason },
        LedgerError::Rejected(rejection) => translate_rejection(rejection),
        LedgerError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: entity.to_string(),
            message: format!("{entity} {id} does not exist"),
        },
        LedgerError::Unavailable(message) => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Ledger(ledger_err) => translate_ledger_error(ledger_err),
        CoreError::IncompleteBooking { missing } => ApiError::MalformedRequest {
            message: format!("No {missing} selected"),
        },
        CoreError::SalonMismatch { expected, actual } => ApiError::InvalidInput {
            field: String::from("salon_id"),
            message: format!("Requested salon {expected}, but the resource belongs to salon {actual}"),
        },
        CoreError::InvalidTransition { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::AppointmentConflict { reason, .. } => {
            ApiError::SlotConflict { message: reason }
        }
        PersistenceError::BookingRejected(rejection) => translate_rejection(rejection),
        PersistenceError::InvalidStatusTransition { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        PersistenceError::SalonNotFound(_)
        | PersistenceError::ServiceNotFound(_)
        | PersistenceError::EmployeeNotFound(_)
        | PersistenceError::AppointmentNotFound(_) => translate_ledger_error(LedgerError::from(err)),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
