// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Day-level availability summaries.
//!
//! This module holds the pure half of availability calculation:
//!
//! - Date ranges over salon-local calendar dates
//! - The "any available" estimate, derived from operating hours alone
//! - Summarizing one employee's generated slots into a day record
//!
//! The employee path that consults the ledger lives in the core crate.
//!
//! ## "Any available" capacity
//!
//! For an open day `totalSlots = floor((close - open) / 30)` and every slot is
//! counted as available. No employee calendars are consulted: assignment is
//! resolved at commit time, so slight overcounting is accepted in exchange
//! for not fanning out a query per employee per day.

use crate::error::DomainError;
use crate::format::local_date;
use crate::operating_hours::{DayHours, OperatingHours};
use crate::slots::{SLOT_INTERVAL_MINUTES, TimeSlot, minutes_since_midnight};
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

/// Days after today included in the default range.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Longest range a caller may request, in days after the start date.
pub const MAX_RANGE_DAYS: i64 = 90;

/// An inclusive range of salon-local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end` precedes `start` or
    /// the range spans more than [`MAX_RANGE_DAYS`] days.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange {
                reason: format!("end date {end} is before start date {start}"),
            });
        }
        if (end - start).whole_days() > MAX_RANGE_DAYS {
            return Err(DomainError::InvalidDateRange {
                reason: format!("range {start}..={end} exceeds {MAX_RANGE_DAYS} days"),
            });
        }
        Ok(Self { start, end })
    }

    /// The default booking horizon: today through today + 30 days.
    ///
    /// # Errors
    ///
    /// Returns an error if the end date overflows the calendar.
    pub fn default_from(today: Date) -> Result<Self, DomainError> {
        let end: Date = today
            .checked_add(Duration::days(DEFAULT_RANGE_DAYS))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("adding {DEFAULT_RANGE_DAYS} days to {today}"),
            })?;
        Ok(Self { start: today, end })
    }

    /// Resolves optional request bounds into a range.
    ///
    /// - Neither bound: the default horizon from `today`
    /// - Start only: the default horizon from that start
    /// - End only: `today` through the end
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting range is invalid.
    pub fn from_bounds(
        start: Option<Date>,
        end: Option<Date>,
        today: Date,
    ) -> Result<Self, DomainError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            (Some(start), None) => Self::default_from(start),
            (None, Some(end)) => Self::new(today, end),
            (None, None) => Self::default_from(today),
        }
    }

    /// First date (inclusive).
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last date (inclusive).
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Iterates every date in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let end: Date = self.end;
        std::iter::successors(Some(self.start), move |date| {
            date.next_day().filter(|next| *next <= end)
        })
    }
}

/// Whether a day has anything bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// At least one slot is available.
    Available,
    /// Closed, fully booked, or entirely past.
    Unavailable,
}

impl DayStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Availability summary for one date.
///
/// `0 <= available_slots <= total_slots` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// The salon-local date.
    #[serde(with = "local_date")]
    pub date: Date,
    /// Derived from `available_slots`.
    pub status: DayStatus,
    /// Candidate slots on the day.
    pub total_slots: u32,
    /// Candidate slots that can still be booked.
    pub available_slots: u32,
}

impl DayAvailability {
    /// Builds a summary from counts, clamping `available` to `total`.
    #[must_use]
    pub fn from_counts(date: Date, total_slots: u32, available_slots: u32) -> Self {
        let available_slots: u32 = available_slots.min(total_slots);
        let status: DayStatus = if available_slots > 0 {
            DayStatus::Available
        } else {
            DayStatus::Unavailable
        };
        Self {
            date,
            status,
            total_slots,
            available_slots,
        }
    }
}

/// Summarizes a day's generated slots.
#[must_use]
pub fn summarize_slots(date: Date, slots: &[TimeSlot]) -> DayAvailability {
    let total: u32 = u32::try_from(slots.len()).unwrap_or(u32::MAX);
    let available: u32 =
        u32::try_from(slots.iter().filter(|slot| slot.available).count()).unwrap_or(u32::MAX);
    DayAvailability::from_counts(date, total, available)
}

/// Number of 30-minute steps in an open day's window.
#[must_use]
pub fn window_slot_count(day: &DayHours) -> u32 {
    if !day.is_open {
        return 0;
    }
    let open: u32 = minutes_since_midnight(day.start_time);
    let close: u32 = minutes_since_midnight(day.end_time);
    close.saturating_sub(open) / SLOT_INTERVAL_MINUTES
}

/// Day summaries for an "any available" booking across a range.
///
/// Uses operating hours only; see the module docs for why this is optimistic.
#[must_use]
pub fn any_available_availability(
    range: &DateRange,
    hours: &OperatingHours,
) -> Vec<DayAvailability> {
    range
        .days()
        .map(|date| {
            let total: u32 = window_slot_count(hours.for_weekday(date.weekday()));
            DayAvailability::from_counts(date, total, total)
        })
        .collect()
}
