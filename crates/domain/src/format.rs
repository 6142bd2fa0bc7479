// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire formats for local calendar values.
//!
//! Every date, time and datetime crossing the engine boundary is a salon-local
//! wall-clock value:
//!
//! - dates are `YYYY-MM-DD`
//! - times are `HH:MM` (24-hour)
//! - appointment datetimes are `YYYY-MM-DDTHH:MM`
//!
//! None of these carry an offset. A UTC timestamp truncated to a date is never
//! accepted as a local date.

use crate::error::DomainError;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

/// Parses a `YYYY-MM-DD` local calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_local_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a local calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `DomainError::FormatError` if the date cannot be formatted.
pub fn format_local_date(date: Date) -> Result<String, DomainError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| DomainError::FormatError(e.to_string()))
}

/// Parses an `HH:MM` local time.
///
/// A single-digit hour (`9:00`) and a trailing seconds field (`09:00:00`)
/// are tolerated since stored salon settings contain both.
///
/// # Errors
///
/// Returns `DomainError::TimeParseError` if the string is not a valid time.
pub fn parse_local_time(value: &str) -> Result<Time, DomainError> {
    let trimmed: &str = value.trim();
    Time::parse(trimmed, format_description!("[hour padding:none]:[minute]"))
        .or_else(|_| {
            Time::parse(
                trimmed,
                format_description!("[hour padding:none]:[minute]:[second]"),
            )
        })
        .map_err(|e| DomainError::TimeParseError {
            time_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Formats a local time as zero-padded `HH:MM`.
///
/// # Errors
///
/// Returns `DomainError::FormatError` if the time cannot be formatted.
pub fn format_local_time(time: Time) -> Result<String, DomainError> {
    time.format(format_description!("[hour]:[minute]"))
        .map_err(|e| DomainError::FormatError(e.to_string()))
}

/// Parses a `YYYY-MM-DDTHH:MM` local datetime.
///
/// # Errors
///
/// Returns `DomainError::DateTimeParseError` if the string is not valid.
pub fn parse_local_datetime(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    PrimitiveDateTime::parse(
        value.trim(),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    )
    .map_err(|e| DomainError::DateTimeParseError {
        datetime_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a local datetime as `YYYY-MM-DDTHH:MM`.
///
/// # Errors
///
/// Returns `DomainError::FormatError` if the datetime cannot be formatted.
pub fn format_local_datetime(datetime: PrimitiveDateTime) -> Result<String, DomainError> {
    datetime
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .map_err(|e| DomainError::FormatError(e.to_string()))
}

/// Serde adapter for `HH:MM` times.
pub mod hhmm {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::Time;

    /// Serializes a `Time` as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Returns a serializer error if formatting fails.
    pub fn serialize<S: Serializer>(value: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let text: String = super::format_local_time(*value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes an `HH:MM` string into a `Time`.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error if the string is not a valid time.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        super::parse_local_time(&text).map_err(D::Error::custom)
    }
}

/// Serde adapter for `YYYY-MM-DD` dates.
pub mod local_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::Date;

    /// Serializes a `Date` as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns a serializer error if formatting fails.
    pub fn serialize<S: Serializer>(value: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text: String = super::format_local_date(*value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a `YYYY-MM-DD` string into a `Date`.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error if the string is not a valid date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        super::parse_local_date(&text).map_err(D::Error::custom)
    }
}

/// Serde adapter for `YYYY-MM-DDTHH:MM` datetimes.
pub mod local_datetime {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::PrimitiveDateTime;

    /// Serializes a `PrimitiveDateTime` as `YYYY-MM-DDTHH:MM`.
    ///
    /// # Errors
    ///
    /// Returns a serializer error if formatting fails.
    pub fn serialize<S: Serializer>(
        value: &PrimitiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text: String = super::format_local_datetime(*value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a `YYYY-MM-DDTHH:MM` string into a `PrimitiveDateTime`.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error if the string is not a valid datetime.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PrimitiveDateTime, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        super::parse_local_datetime(&text).map_err(D::Error::custom)
    }
}
