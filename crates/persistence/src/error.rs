// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use salon_booking::{LedgerError, Rejection};
use salon_booking_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored value could not be read back as a domain value.
    InvalidData(String),
    /// The requested salon was not found.
    SalonNotFound(i64),
    /// The requested service was not found.
    ServiceNotFound(i64),
    /// The requested employee was not found or is inactive.
    EmployeeNotFound(i64),
    /// The requested appointment was not found.
    AppointmentNotFound(i64),
    /// The commit lost to an overlapping appointment, or no employee was free.
    AppointmentConflict {
        /// The employee whose calendar collided, when one was chosen.
        employee_id: Option<i64>,
        /// Caller-displayable reason.
        reason: String,
    },
    /// The commit was refused by a rule other than overlap.
    BookingRejected(Rejection),
    /// The appointment cannot move to the requested status.
    InvalidStatusTransition {
        /// The appointment.
        appointment_id: i64,
        /// Its current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::InvalidData(msg) => write!(f, "Invalid stored data: {msg}"),
            Self::SalonNotFound(id) => write!(f, "Salon not found: {id}"),
            Self::ServiceNotFound(id) => write!(f, "Service not found: {id}"),
            Self::EmployeeNotFound(id) => write!(f, "Employee not found: {id}"),
            Self::AppointmentNotFound(id) => write!(f, "Appointment not found: {id}"),
            Self::AppointmentConflict {
                employee_id: Some(employee_id),
                reason,
            } => write!(f, "Appointment conflict for employee {employee_id}: {reason}"),
            Self::AppointmentConflict {
                employee_id: None,
                reason,
            } => write!(f, "Appointment conflict: {reason}"),
            Self::BookingRejected(rejection) => write!(f, "Booking rejected: {rejection}"),
            Self::InvalidStatusTransition {
                appointment_id,
                from,
                to,
            } => {
                write!(
                    f,
                    "Appointment {appointment_id} cannot move from '{from}' to '{to}'"
                )
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::InvalidData(err.to_string())
    }
}

impl From<PersistenceError> for LedgerError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::AppointmentConflict { reason, .. } => Self::Conflict { reason },
            PersistenceError::BookingRejected(rejection) => Self::Rejected(rejection),
            PersistenceError::SalonNotFound(id) => Self::NotFound { entity: "Salon", id },
            PersistenceError::ServiceNotFound(id) => Self::NotFound {
                entity: "Service",
                id,
            },
            PersistenceError::EmployeeNotFound(id) => Self::NotFound {
                entity: "Employee",
                id,
            },
            PersistenceError::AppointmentNotFound(id) => Self::NotFound {
                entity: "Appointment",
                id,
            },
            other => Self::Unavailable(other.to_string()),
        }
    }
}
