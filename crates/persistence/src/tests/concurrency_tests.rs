// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Two clients racing for the same employee and window.

use std::path::PathBuf;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use super::{NOW, create_test_fixture, create_test_request, seed};
use crate::{PersistenceError, SqlitePersistence};
use salon_booking_domain::{Appointment, BookingRequest, Service};
use time::macros::{date, datetime};

type CommitResult = Result<Appointment, PersistenceError>;

fn assert_one_winner(results: &[CommitResult]) {
    let winners: usize = results.iter().filter(|result| result.is_ok()).count();
    let conflicts: usize = results
        .iter()
        .filter(|result| matches!(result, Err(PersistenceError::AppointmentConflict { .. })))
        .count();
    assert_eq!(winners, 1, "results: {results:?}");
    assert_eq!(conflicts, results.len() - 1, "results: {results:?}");
}

#[test]
fn test_shared_adapter_commits_exactly_one() {
    let fixture = create_test_fixture();
    let request: BookingRequest = create_test_request(
        &fixture.service,
        Some(fixture.alice.employee_id),
        datetime!(2026-03-02 13:00),
    );
    let persistence = Arc::new(Mutex::new(fixture.persistence));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let persistence = Arc::clone(&persistence);
            let barrier = Arc::clone(&barrier);
            let request: BookingRequest = request.clone();
            thread::spawn(move || {
                barrier.wait();
                persistence
                    .lock()
                    .unwrap()
                    .create_appointment(&request, NOW)
            })
        })
        .collect();

    let results: Vec<CommitResult> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_one_winner(&results);

    let stored = persistence
        .lock()
        .unwrap()
        .list_appointments_for_employee(fixture.alice.employee_id, date!(2026 - 03 - 02))
        .unwrap();
    assert_eq!(stored.len(), 1);
}

struct TempDatabase(PathBuf);

impl TempDatabase {
    fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "salon_booking_{label}_{}.db",
            std::process::id()
        ));
        let database = Self(path);
        database.remove();
        database
    }

    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.0.display()));
        }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        self.remove();
    }
}

#[test]
fn test_separate_connections_commit_exactly_one() {
    let database = TempDatabase::new("race");
    let service: Service = {
        let mut setup = SqlitePersistence::new_with_file(&database.0).unwrap();
        seed(&mut setup);
        setup.get_service(1).unwrap()
    };
    let request: BookingRequest =
        create_test_request(&service, Some(1), datetime!(2026-03-02 13:00));

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let path: PathBuf = database.0.clone();
            let barrier = Arc::clone(&barrier);
            let request: BookingRequest = request.clone();
            thread::spawn(move || {
                let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
                barrier.wait();
                persistence.create_appointment(&request, NOW)
            })
        })
        .collect();

    let results: Vec<CommitResult> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_one_winner(&results);

    let mut check = SqlitePersistence::new_with_file(&database.0).unwrap();
    let stored = check
        .list_appointments_for_employee(1, date!(2026 - 03 - 02))
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn test_any_available_race_assigns_distinct_employees() {
    let database = TempDatabase::new("any_race");
    let service: Service = {
        let mut setup = SqlitePersistence::new_with_file(&database.0).unwrap();
        seed(&mut setup);
        setup.get_service(1).unwrap()
    };
    let request: BookingRequest = create_test_request(&service, None, datetime!(2026-03-02 13:00));

    let barrier = Arc::new(Barrier::new(3));
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let path: PathBuf = database.0.clone();
            let barrier = Arc::clone(&barrier);
            let request: BookingRequest = request.clone();
            thread::spawn(move || {
                let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
                barrier.wait();
                persistence.create_appointment(&request, NOW)
            })
        })
        .collect();

    let results: Vec<CommitResult> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let mut assigned: Vec<i64> = results
        .iter()
        .filter_map(|result| result.as_ref().ok())
        .filter_map(|appointment| appointment.employee_id)
        .collect();
    assigned.sort_unstable();
    assert_eq!(assigned, vec![1, 2]);
    assert_eq!(
        results.iter().filter(|result| result.is_err()).count(),
        1,
        "results: {results:?}"
    );
}
