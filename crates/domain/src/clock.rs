// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Salon-local wall clock.
//!
//! "Now" is always evaluated in the salon's own timezone before any date
//! comparison. Converting to UTC first can move the calendar date across
//! midnight for salons east of Greenwich, which is exactly the off-by-one-day
//! error the engine must not make.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// An IANA timezone name validated against the tz database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SalonTimezone {
    name: String,
}

impl SalonTimezone {
    /// Creates a validated timezone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not a known zone.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let trimmed: &str = name.trim();
        trimmed
            .parse::<Tz>()
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))?;
        Ok(Self {
            name: trimmed.to_string(),
        })
    }

    /// The UTC zone, used when a salon has not declared one.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            name: String::from("UTC"),
        }
    }

    /// Returns the zone name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts an absolute instant to this salon's local wall-clock time.
    ///
    /// Sub-second precision is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone cannot be resolved or the instant is out
    /// of range for the conversion.
    pub fn local_now(&self, instant: OffsetDateTime) -> Result<PrimitiveDateTime, DomainError> {
        let tz: Tz = self
            .name
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(self.name.clone()))?;

        let utc: DateTime<Utc> = DateTime::from_timestamp(instant.unix_timestamp(), 0)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("converting instant {instant} to chrono"),
            })?;
        let local = utc.with_timezone(&tz).naive_local();

        let month: Month = u8::try_from(local.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("reading month of {local}"),
            })?;
        let day: u8 =
            u8::try_from(local.day()).map_err(|_| DomainError::DateArithmeticOverflow {
                operation: format!("reading day of {local}"),
            })?;
        let date: Date = Date::from_calendar_date(local.year(), month, day).map_err(|e| {
            DomainError::DateArithmeticOverflow {
                operation: format!("building local date: {e}"),
            }
        })?;

        let (hour, minute, second) = (
            u8::try_from(local.hour()),
            u8::try_from(local.minute()),
            u8::try_from(local.second()),
        );
        let time: Time = match (hour, minute, second) {
            (Ok(h), Ok(m), Ok(s)) => {
                Time::from_hms(h, m, s).map_err(|e| DomainError::DateArithmeticOverflow {
                    operation: format!("building local time: {e}"),
                })?
            }
            _ => {
                return Err(DomainError::DateArithmeticOverflow {
                    operation: format!("reading time of {local}"),
                });
            }
        };

        Ok(PrimitiveDateTime::new(date, time))
    }
}

impl Default for SalonTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl TryFrom<String> for SalonTimezone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SalonTimezone> for String {
    fn from(value: SalonTimezone) -> Self {
        value.name
    }
}

impl std::fmt::Display for SalonTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_invalid_timezone_rejected() {
        let result = SalonTimezone::new("Mars/Olympus_Mons");
        assert_eq!(
            result,
            Err(DomainError::InvalidTimezone(String::from(
                "Mars/Olympus_Mons"
            )))
        );
    }

    #[test]
    fn test_utc_local_now_is_identity() {
        let tz: SalonTimezone = SalonTimezone::utc();
        let local = tz.local_now(datetime!(2026-03-02 10:15:30 UTC)).unwrap();
        assert_eq!(local, datetime!(2026-03-02 10:15:30));
    }

    #[test]
    fn test_east_of_utc_crosses_midnight_forward() {
        // 22:30 UTC is already the next morning in Tokyo
        let tz: SalonTimezone = SalonTimezone::new("Asia/Tokyo").unwrap();
        let local = tz.local_now(datetime!(2026-03-02 22:30 UTC)).unwrap();
        assert_eq!(local.date(), date!(2026 - 03 - 03));
        assert_eq!(local.time(), time!(07:30));
    }

    #[test]
    fn test_west_of_utc_stays_on_previous_day() {
        let tz: SalonTimezone = SalonTimezone::new("America/New_York").unwrap();
        let local = tz.local_now(datetime!(2026-01-10 03:00 UTC)).unwrap();
        assert_eq!(local.date(), date!(2026 - 01 - 09));
        assert_eq!(local.time(), time!(22:00));
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let parsed: Result<SalonTimezone, _> = serde_json::from_str("\"Nowhere/City\"");
        assert!(parsed.is_err());

        let parsed: SalonTimezone = serde_json::from_str("\"Europe/Paris\"").unwrap();
        assert_eq!(parsed.name(), "Europe/Paris");
    }
}
