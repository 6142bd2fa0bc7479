// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening the `SQLite` appointment ledger.
//!
//! Every connection, in-memory or file-backed, is configured the same way
//! before migrations run:
//!
//! - `foreign_keys = ON`, verified after opening
//! - `busy_timeout = BUSY_TIMEOUT_MS`, so a commit queued behind another
//!   connection's `BEGIN IMMEDIATE` waits instead of failing with `SQLITE_BUSY`
//!
//! File-backed ledgers additionally switch to WAL so slot reads are not
//! blocked by an in-flight booking commit.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// How long a connection waits for another writer's lock, in milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Ledger schema: salons, services, employees, appointments.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Where a ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerStorage {
    /// A named shared-cache in-memory database, private to this process.
    InMemory(String),
    /// A database file, shareable between processes.
    File(String),
}

impl LedgerStorage {
    fn url(&self) -> String {
        match self {
            Self::InMemory(name) => format!("file:{name}?mode=memory&cache=shared"),
            Self::File(path) => path.clone(),
        }
    }

    const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

/// Opens a ledger, configures the connection and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, a PRAGMA fails, a
/// migration fails, or foreign keys are not enforced afterwards.
pub fn open(storage: &LedgerStorage) -> Result<SqliteConnection, PersistenceError> {
    let url: String = storage.url();
    info!(database_url = %url, "Opening appointment ledger");

    let mut conn: SqliteConnection = SqliteConnection::establish(&url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    for pragma in [
        String::from("PRAGMA foreign_keys = ON"),
        format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
    ] {
        apply_pragma(&mut conn, &pragma)?;
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    if storage.is_file() {
        apply_pragma(&mut conn, "PRAGMA journal_mode = WAL")?;
    }

    verify_foreign_key_enforcement(&mut conn)?;
    debug!(journal_mode = %journal_mode(&mut conn)?, "Ledger ready");
    Ok(conn)
}

fn apply_pragma(conn: &mut SqliteConnection, pragma: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(pragma)
        .execute(conn)
        .map(|_| ())
        .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))
}

/// Returns the row ID of the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement is on.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if it is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}

/// The connection's journal mode, lowercased (`wal`, `memory`, `delete`).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn journal_mode(conn: &mut SqliteConnection) -> Result<String, PersistenceError> {
    let row: JournalModeRow = diesel::sql_query("PRAGMA journal_mode").get_result(conn)?;
    Ok(row.journal_mode.to_lowercase())
}
