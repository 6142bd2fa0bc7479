// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Service duration must be a positive number of minutes.
    InvalidDuration {
        /// The rejected duration.
        minutes: u16,
    },
    /// A date range is inverted or too long.
    InvalidDateRange {
        /// Description of the validation error.
        reason: String,
    },
    /// The timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Failed to parse a `YYYY-MM-DD` date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse an `HH:MM` time.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a `YYYY-MM-DDTHH:MM` local datetime.
    DateTimeParseError {
        /// The invalid datetime string.
        datetime_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a date or time value.
    FormatError(String),
    /// Appointment status string is not recognized.
    InvalidAppointmentStatus(String),
    /// Assignment mode string is not recognized.
    InvalidAssignmentMode(String),
    /// A display name is empty.
    InvalidName(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDuration { minutes } => {
                write!(
                    f,
                    "Invalid service duration: {minutes} minutes. Must be greater than 0"
                )
            }
            Self::InvalidDateRange { reason } => write!(f, "Invalid date range: {reason}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
            Self::DateTimeParseError {
                datetime_string,
                error,
            } => {
                write!(f, "Failed to parse datetime '{datetime_string}': {error}")
            }
            Self::FormatError(msg) => write!(f, "Failed to format value: {msg}"),
            Self::InvalidAppointmentStatus(status) => {
                write!(f, "Invalid appointment status: '{status}'")
            }
            Self::InvalidAssignmentMode(mode) => {
                write!(
                    f,
                    "Invalid assignment mode: '{mode}'. Must be 'specific' or 'any'"
                )
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
