// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::clock::SalonTimezone;
use crate::error::DomainError;
use crate::format::local_datetime;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU16;
use std::str::FromStr;
use time::{Duration, PrimitiveDateTime};

/// A service duration in whole minutes.
///
/// Duration is the sole driver of slot width and is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct DurationMinutes(NonZeroU16);

impl DurationMinutes {
    /// Creates a validated duration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDuration` if `minutes` is zero.
    pub fn new(minutes: u16) -> Result<Self, DomainError> {
        NonZeroU16::new(minutes)
            .map(Self)
            .ok_or(DomainError::InvalidDuration { minutes })
    }

    /// Returns the number of minutes.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Returns the duration as a `time::Duration`.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.get()))
    }
}

impl TryFrom<u16> for DurationMinutes {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurationMinutes> for u16 {
    fn from(value: DurationMinutes) -> Self {
        value.get()
    }
}

impl std::fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min", self.get())
    }
}

/// A salon as seen by the booking engine.
///
/// The raw operating hours are kept exactly as stored; they are resolved per
/// request by the operating hours resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salon {
    /// The canonical salon identifier.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// The salon's local timezone.
    pub timezone: SalonTimezone,
    /// Raw operating hours setting, possibly multiply encoded.
    pub operating_hours: Option<String>,
}

/// A bookable service offered by a salon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// The canonical service identifier.
    pub service_id: i64,
    /// The salon offering this service.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// How long one booking of this service takes.
    pub duration: DurationMinutes,
    /// Whether the service can currently be booked.
    pub is_active: bool,
}

/// A salon employee who can be booked.
///
/// Only active employees participate in availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The canonical employee identifier.
    pub employee_id: i64,
    /// The salon the employee works at.
    pub salon_id: i64,
    /// Display name.
    pub name: String,
    /// Whether the employee is currently taking bookings.
    pub is_active: bool,
}

/// Lifecycle status of an appointment in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Committed but not yet confirmed by the salon.
    #[default]
    Pending,
    /// Confirmed by the salon.
    Confirmed,
    /// Cancelled. No longer occupies time.
    Cancelled,
    /// Service delivered.
    Completed,
}

impl AppointmentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns whether an appointment in this status occupies the employee's time.
    #[must_use]
    pub const fn blocks_time(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidAppointmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A half-open local time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingWindow {
    /// Inclusive start.
    #[serde(with = "local_datetime")]
    pub start: PrimitiveDateTime,
    /// Exclusive end.
    #[serde(with = "local_datetime")]
    pub end: PrimitiveDateTime,
}

impl BookingWindow {
    /// Creates a window. No ordering check is made here; see `is_well_formed`.
    #[must_use]
    pub const fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns whether `start < end`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Returns the window length.
    #[must_use]
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Returns whether two windows share any instant.
    ///
    /// `existing.start < requested.end && existing.end > requested.start`.
    /// Windows that merely touch (one ends when the other starts) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// An appointment row from the external ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// The canonical appointment identifier.
    pub appointment_id: i64,
    /// The salon the appointment is at.
    pub salon_id: i64,
    /// The assigned employee. `None` while an "any available" booking awaits assignment.
    pub employee_id: Option<i64>,
    /// The booked service.
    pub service_id: i64,
    /// The customer who booked.
    pub customer_id: i64,
    /// Scheduled local start.
    #[serde(with = "local_datetime")]
    pub scheduled_start: PrimitiveDateTime,
    /// Scheduled local end.
    #[serde(with = "local_datetime")]
    pub scheduled_end: PrimitiveDateTime,
    /// Current status.
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Returns the appointment's time window.
    #[must_use]
    pub const fn window(&self) -> BookingWindow {
        BookingWindow::new(self.scheduled_start, self.scheduled_end)
    }

    /// Returns whether this appointment occupies time that overlaps `window`.
    ///
    /// Cancelled and completed appointments never block.
    #[must_use]
    pub fn blocks(&self, window: &BookingWindow) -> bool {
        self.status.blocks_time() && self.window().overlaps(window)
    }
}

/// How the employee for a booking is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// The customer picked a specific employee.
    Specific,
    /// Any active employee; assigned by the ledger at commit time.
    Any,
}

impl AssignmentMode {
    /// Converts this mode to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Specific => "specific",
            Self::Any => "any",
        }
    }
}

impl FromStr for AssignmentMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "specific" => Ok(Self::Specific),
            "any" => Ok(Self::Any),
            _ => Err(DomainError::InvalidAssignmentMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully specified booking attempt.
///
/// The salon is implied by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// The requested employee. Required for `Specific`, ignored for `Any`.
    pub employee_id: Option<i64>,
    /// The service to book.
    pub service_id: i64,
    /// Requested local start.
    #[serde(with = "local_datetime")]
    pub scheduled_start: PrimitiveDateTime,
    /// Requested local end.
    #[serde(with = "local_datetime")]
    pub scheduled_end: PrimitiveDateTime,
    /// The customer making the booking.
    pub customer_id: i64,
    /// How the employee is chosen.
    pub assignment_mode: AssignmentMode,
}

impl BookingRequest {
    /// Returns the requested time window.
    #[must_use]
    pub const fn window(&self) -> BookingWindow {
        BookingWindow::new(self.scheduled_start, self.scheduled_end)
    }
}
