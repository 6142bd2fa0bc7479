// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{SALON_ID, SERVICE_ID, create_test_ledger};
use crate::{BookingContext, CoreError, LedgerError};
use salon_booking_domain::{DomainError, HoursEncoding, HoursResolution, SalonTimezone};
use time::macros::{date, datetime};

#[test]
fn test_load_resolves_service_salon_and_hours() {
    let mut ledger = create_test_ledger();
    let context: BookingContext =
        BookingContext::load(&mut ledger, SERVICE_ID, datetime!(2026-03-02 08:00 UTC)).unwrap();

    assert_eq!(context.salon().salon_id, SALON_ID);
    assert_eq!(context.duration().get(), 60);
    assert_eq!(context.now(), datetime!(2026-03-02 08:00));
    assert!(matches!(
        context.hours_resolution(),
        HoursResolution::Resolved {
            encoding: HoursEncoding::StructuredObject,
            ..
        }
    ));
}

#[test]
fn test_now_uses_salon_local_date_ahead_of_utc() {
    let mut ledger = create_test_ledger();
    ledger.salons[0].timezone = SalonTimezone::new("Asia/Tokyo").unwrap();

    let context: BookingContext =
        BookingContext::load(&mut ledger, SERVICE_ID, datetime!(2026-03-01 20:00 UTC)).unwrap();

    assert_eq!(context.today(), date!(2026 - 03 - 02));
    assert_eq!(context.now(), datetime!(2026-03-02 05:00));
}

#[test]
fn test_unconfigured_hours_fall_back_to_default_window() {
    let mut ledger = create_test_ledger();
    ledger.salons[0].operating_hours = Some(String::from("by appointment"));

    let context: BookingContext =
        BookingContext::load(&mut ledger, SERVICE_ID, datetime!(2026-03-02 08:00 UTC)).unwrap();

    assert!(!context.hours_resolution().is_configured());
    assert_eq!(
        context.operating_hours(),
        salon_booking_domain::OperatingHours::default_window()
    );
}

#[test]
fn test_load_for_other_salon_is_mismatch() {
    let mut ledger = create_test_ledger();
    let result = BookingContext::load_for_salon(
        &mut ledger,
        SALON_ID + 1,
        SERVICE_ID,
        datetime!(2026-03-02 08:00 UTC),
    );
    assert_eq!(
        result,
        Err(CoreError::SalonMismatch {
            expected: SALON_ID + 1,
            actual: SALON_ID,
        })
    );
}

#[test]
fn test_missing_service_is_not_found() {
    let mut ledger = create_test_ledger();
    let result = BookingContext::load(&mut ledger, 999, datetime!(2026-03-02 08:00 UTC));
    assert_eq!(
        result,
        Err(CoreError::Ledger(LedgerError::NotFound {
            entity: "Service",
            id: 999,
        }))
    );
}

#[test]
fn test_default_date_range_starts_today() {
    let mut ledger = create_test_ledger();
    let context: BookingContext =
        BookingContext::load(&mut ledger, SERVICE_ID, datetime!(2026-03-02 23:30 UTC)).unwrap();

    let range = context.date_range(None, None).unwrap();
    assert_eq!(range.start(), date!(2026 - 03 - 02));
    assert_eq!(range.end(), date!(2026 - 04 - 01));
}

#[test]
fn test_inverted_date_range_is_domain_violation() {
    let mut ledger = create_test_ledger();
    let context: BookingContext =
        BookingContext::load(&mut ledger, SERVICE_ID, datetime!(2026-03-02 08:00 UTC)).unwrap();

    let result = context.date_range(Some(date!(2026 - 03 - 10)), Some(date!(2026 - 03 - 01)));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidDateRange { .. }))
    ));
}
