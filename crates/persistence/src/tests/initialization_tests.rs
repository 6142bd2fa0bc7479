// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, SqlitePersistence};
use salon_booking_domain::SalonTimezone;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, PersistenceError> = SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_enforced() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_ledger_is_not_wal() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert_eq!(persistence.journal_mode().unwrap(), "memory");
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = SqlitePersistence::new_in_memory().unwrap();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    let salon = db1
        .create_salon("Only in db1", &SalonTimezone::utc(), None)
        .unwrap();

    assert!(db1.get_salon(salon.salon_id).is_ok());
    assert_eq!(
        db2.get_salon(salon.salon_id),
        Err(PersistenceError::SalonNotFound(salon.salon_id))
    );
}

#[test]
fn test_file_database_reopens_with_data() {
    let path = std::env::temp_dir().join(format!(
        "salon_booking_reopen_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
        persistence
            .create_salon("Persisted", &SalonTimezone::utc(), Some("10:00-16:00"))
            .unwrap();
    }

    let mut reopened = SqlitePersistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.journal_mode().unwrap(), "wal");
    let salon = reopened.get_salon(1).unwrap();
    assert_eq!(salon.name, "Persisted");
    assert_eq!(salon.operating_hours.as_deref(), Some("10:00-16:00"));

    drop(reopened);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
