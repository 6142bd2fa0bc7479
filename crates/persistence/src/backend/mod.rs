// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection setup and the raw-SQL helpers Diesel's DSL cannot express.
//! Ledger reads and writes live in `queries/` and `mutations/`.

pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

/// Raw-SQL operations the mutations rely on.
pub trait PersistenceBackend: Connection {
    /// Row ID assigned by the last insert on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Fails unless foreign keys are enforced.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or the query fails.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// The journal mode in effect, lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn journal_mode(&mut self) -> Result<String, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn journal_mode(&mut self) -> Result<String, PersistenceError> {
        sqlite::journal_mode(self)
    }
}
