// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ledger::LedgerError;
use salon_booking_domain::DomainError;

/// Errors that can occur while driving a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The ledger could not answer or refused a commit.
    Ledger(LedgerError),
    /// An event was applied to a booking state that does not accept it.
    InvalidTransition {
        /// Name of the current state.
        state: &'static str,
        /// Name of the rejected event.
        event: &'static str,
    },
    /// A draft was submitted before every required selection was made.
    IncompleteBooking {
        /// The missing selection.
        missing: &'static str,
    },
    /// The service belongs to a different salon than the one requested.
    SalonMismatch {
        /// The salon in the request.
        expected: i64,
        /// The salon that owns the service or employee.
        actual: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Ledger(err) => write!(f, "Ledger error: {err}"),
            Self::InvalidTransition { state, event } => {
                write!(f, "Cannot apply '{event}' to a booking in state '{state}'")
            }
            Self::IncompleteBooking { missing } => {
                write!(f, "Booking is incomplete: no {missing} selected")
            }
            Self::SalonMismatch { expected, actual } => {
                write!(f, "Expected salon {expected}, but it belongs to salon {actual}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<LedgerError> for CoreError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}
