// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, validate_name, validate_timezone_or_default};

#[test]
fn test_validate_name_trims() {
    assert_eq!(validate_name("  Studio 54 ").unwrap(), "Studio 54");
}

#[test]
fn test_validate_name_rejects_blank() {
    assert!(matches!(
        validate_name("   "),
        Err(DomainError::InvalidName(_))
    ));
}

#[test]
fn test_timezone_defaults_to_utc() {
    assert_eq!(validate_timezone_or_default(None).unwrap().name(), "UTC");
    assert_eq!(validate_timezone_or_default(Some("")).unwrap().name(), "UTC");
    assert_eq!(
        validate_timezone_or_default(Some("Europe/Istanbul"))
            .unwrap()
            .name(),
        "Europe/Istanbul"
    );
    assert!(validate_timezone_or_default(Some("Atlantis/Capital")).is_err());
}
