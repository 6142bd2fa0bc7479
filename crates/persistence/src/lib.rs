// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the salon booking engine.
//!
//! This crate is the appointment ledger: salons, services, employees and
//! appointments stored in `SQLite` through Diesel. It implements the core
//! crate's `BookingLedger` port.
//!
//! ## Serialized commits
//!
//! `create_appointment` repeats the validator's overlap test inside a
//! `BEGIN IMMEDIATE` transaction. `SQLite` allows one writer at a time, so a
//! losing concurrent writer always sees the winner's row and is rejected with
//! `PersistenceError::AppointmentConflict`. Connections wait up to
//! `BUSY_TIMEOUT_MS` for the write lock rather than failing immediately.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives every caller its own shared-cache in-memory database
//! - File-backed databases run in WAL mode; concurrency tests use two
//!   connections to one file

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

use diesel::SqliteConnection;
use salon_booking_domain::{
    Appointment, AppointmentStatus, BookingRequest, DurationMinutes, Employee, Salon,
    SalonTimezone, Service,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, PrimitiveDateTime};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod diesel_schema;
mod error;
mod ledger;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::sqlite::BUSY_TIMEOUT_MS;
pub use error::PersistenceError;
pub use mutations::appointments::is_allowed_transition;

use backend::PersistenceBackend;
use backend::sqlite::LedgerStorage;

/// Type alias used by the API and server layers.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for the appointment ledger.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let storage = LedgerStorage::InMemory(format!("memdb_test_{db_id}"));
        Ok(Self {
            conn: backend::sqlite::open(&storage)?,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; their commits are serialized
    /// by `SQLite`'s write lock.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let storage = LedgerStorage::File(path_str.to_string());
        Ok(Self {
            conn: backend::sqlite::open(&storage)?,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Returns the journal mode in effect: `wal` for files, `memory` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn journal_mode(&mut self) -> Result<String, PersistenceError> {
        self.conn.journal_mode()
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Creates a salon with its raw operating hours setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_salon(
        &mut self,
        name: &str,
        timezone: &SalonTimezone,
        operating_hours: Option<&str>,
    ) -> Result<Salon, PersistenceError> {
        mutations::catalog::create_salon(&mut self.conn, name, timezone, operating_hours)
    }

    /// Replaces a salon's raw operating hours setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the salon does not exist.
    pub fn set_salon_operating_hours(
        &mut self,
        salon_id: i64,
        operating_hours: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::set_salon_operating_hours(&mut self.conn, salon_id, operating_hours)
    }

    /// Creates an active service.
    ///
    /// # Errors
    ///
    /// Returns an error if the salon does not exist.
    pub fn create_service(
        &mut self,
        salon_id: i64,
        name: &str,
        duration: DurationMinutes,
    ) -> Result<Service, PersistenceError> {
        mutations::catalog::create_service(&mut self.conn, salon_id, name, duration)
    }

    /// Creates an active employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the salon does not exist.
    pub fn create_employee(
        &mut self,
        salon_id: i64,
        name: &str,
    ) -> Result<Employee, PersistenceError> {
        mutations::catalog::create_employee(&mut self.conn, salon_id, name)
    }

    /// Activates or deactivates an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist.
    pub fn set_employee_active(
        &mut self,
        employee_id: i64,
        is_active: bool,
    ) -> Result<Employee, PersistenceError> {
        mutations::catalog::set_employee_active(&mut self.conn, employee_id, is_active)
    }

    /// Retrieves a salon.
    ///
    /// # Errors
    ///
    /// Returns an error if the salon does not exist.
    pub fn get_salon(&mut self, salon_id: i64) -> Result<Salon, PersistenceError> {
        queries::catalog::get_salon(&mut self.conn, salon_id)
    }

    /// Retrieves a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service does not exist.
    pub fn get_service(&mut self, service_id: i64) -> Result<Service, PersistenceError> {
        queries::catalog::get_service(&mut self.conn, service_id)
    }

    /// Retrieves an employee, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist.
    pub fn get_employee(&mut self, employee_id: i64) -> Result<Employee, PersistenceError> {
        queries::catalog::get_employee(&mut self.conn, employee_id)
    }

    /// Lists a salon's employees, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_employees(&mut self, salon_id: i64) -> Result<Vec<Employee>, PersistenceError> {
        queries::catalog::list_employees(&mut self.conn, salon_id)
    }

    // ========================================================================
    // Appointments
    // ========================================================================

    /// Commits a booking with a serialized overlap check.
    ///
    /// # Arguments
    ///
    /// * `request` - The booking to commit
    /// * `now` - The salon-local current time
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AppointmentConflict` if the window is taken.
    pub fn create_appointment(
        &mut self,
        request: &BookingRequest,
        now: PrimitiveDateTime,
    ) -> Result<Appointment, PersistenceError> {
        mutations::appointments::create_appointment(&mut self.conn, request, now)
    }

    /// Retrieves an appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist.
    pub fn get_appointment(&mut self, appointment_id: i64) -> Result<Appointment, PersistenceError> {
        queries::appointments::get_appointment(&mut self.conn, appointment_id)
    }

    /// Lists one employee's appointments on a salon-local date, ordered by start.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_appointments_for_employee(
        &mut self,
        employee_id: i64,
        date: Date,
    ) -> Result<Vec<Appointment>, PersistenceError> {
        queries::appointments::list_appointments_for_employee(&mut self.conn, employee_id, date)
    }

    /// Moves an appointment along its status lifecycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist or the move is not allowed.
    pub fn update_appointment_status(
        &mut self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, PersistenceError> {
        mutations::appointments::update_appointment_status(&mut self.conn, appointment_id, status)
    }

    /// Cancels a pending or confirmed appointment, freeing its window.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist or no longer blocks time.
    pub fn cancel_appointment(
        &mut self,
        appointment_id: i64,
    ) -> Result<Appointment, PersistenceError> {
        mutations::appointments::cancel_appointment(&mut self.conn, appointment_id)
    }
}
