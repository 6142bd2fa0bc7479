// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::clock::SalonTimezone;
use crate::error::DomainError;

/// Validates a catalog display name (salon, service or employee).
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or whitespace.
pub fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates an optional timezone name, defaulting to UTC when absent.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if a name is given but unknown.
pub fn validate_timezone_or_default(name: Option<&str>) -> Result<SalonTimezone, DomainError> {
    match name.map(str::trim) {
        Some(tz) if !tz.is_empty() => SalonTimezone::new(tz),
        _ => Ok(SalonTimezone::utc()),
    }
}
