// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The port through which the engine reads and writes the appointment ledger.
//!
//! The engine never owns storage. Everything it knows about salons, staff and
//! existing bookings arrives through [`BookingLedger`], and the only write is
//! [`BookingLedger::create_appointment`], which must serialize its own
//! overlap check against concurrent writers.

use crate::validator::Rejection;
use salon_booking_domain::{
    Appointment, BookingRequest, DateRange, DayAvailability, DurationMinutes, Employee, Salon,
    Service, TimeSlot,
};
use time::{Date, PrimitiveDateTime};

/// Errors reported by a ledger implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The commit lost to an overlapping appointment, or no employee was free.
    ///
    /// Callers must refresh their slot view before another attempt.
    Conflict {
        /// Caller-displayable reason.
        reason: String,
    },
    /// The commit was refused by a rule other than overlap.
    Rejected(Rejection),
    /// A referenced row does not exist or is not active.
    NotFound {
        /// The kind of entity.
        entity: &'static str,
        /// The requested identifier.
        id: i64,
    },
    /// The ledger could not be reached or failed internally.
    Unavailable(String),
}

impl LedgerError {
    /// Returns whether this is an authoritative commit conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Converts a refused commit into the rejection shown to the customer.
    ///
    /// Returns `None` for errors that are not booking outcomes.
    #[must_use]
    pub fn as_rejection(&self) -> Option<Rejection> {
        match self {
            Self::Conflict { reason } => Some(Rejection::new(
                crate::validator::RejectionKind::OverlapConflict,
                reason.clone(),
            )),
            Self::Rejected(rejection) => Some(rejection.clone()),
            Self::NotFound { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { reason } => write!(f, "Booking conflict: {reason}"),
            Self::Rejected(rejection) => write!(f, "Booking rejected: {rejection}"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Unavailable(msg) => write!(f, "Ledger unavailable: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Read/write access to salons, staff and the appointment ledger.
///
/// All times are salon-local wall-clock values.
pub trait BookingLedger {
    /// Loads a salon.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the salon does not exist.
    fn salon(&mut self, salon_id: i64) -> Result<Salon, LedgerError>;

    /// Returns the raw, possibly multiply-encoded operating hours setting.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the salon does not exist.
    fn operating_hours(&mut self, salon_id: i64) -> Result<Option<String>, LedgerError> {
        Ok(self.salon(salon_id)?.operating_hours)
    }

    /// Loads a service.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the service does not exist.
    fn service(&mut self, service_id: i64) -> Result<Service, LedgerError>;

    /// Loads an active employee.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the employee does not exist or is inactive.
    fn active_employee(&mut self, employee_id: i64) -> Result<Employee, LedgerError>;

    /// Lists one employee's appointments starting or ending on `date`, ordered by start.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn appointments_for_employee(
        &mut self,
        employee_id: i64,
        date: Date,
    ) -> Result<Vec<Appointment>, LedgerError>;

    /// Per-day availability for one employee, already filtered against their bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn employee_availability(
        &mut self,
        employee_id: i64,
        range: &DateRange,
        service_id: i64,
        duration: DurationMinutes,
        now: PrimitiveDateTime,
    ) -> Result<Vec<DayAvailability>, LedgerError>;

    /// One employee's slots for a day, each pre-marked against their bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn employee_time_slots(
        &mut self,
        employee_id: i64,
        date: Date,
        duration: DurationMinutes,
        service_id: i64,
        now: PrimitiveDateTime,
    ) -> Result<Vec<TimeSlot>, LedgerError>;

    /// Commits a booking.
    ///
    /// Implementations must repeat the overlap check under a serialization
    /// guarantee scoped to the employee and window, and must reject rather
    /// than overwrite a losing concurrent writer. For `any` bookings the
    /// employee is assigned here.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Conflict` if the window is taken.
    fn create_appointment(
        &mut self,
        request: &BookingRequest,
        now: PrimitiveDateTime,
    ) -> Result<Appointment, LedgerError>;
}
