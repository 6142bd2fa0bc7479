// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate slot generation for a single calendar day.
//!
//! The open window is walked in fixed 30-minute steps from the opening time.
//! A step becomes a slot only if a full service fits before closing; slots
//! that would spill past closing are dropped, never clipped.
//!
//! ## Invariants
//!
//! - Closed days produce no slots
//! - Every slot satisfies `open <= start` and `start + duration <= close`
//! - On the salon-local "today", no slot starting before "now" is available
//! - Slot boundaries are integer minutes since local midnight
//!
//! Generated slots are provisional. For a specific employee the ledger marks
//! booked slots with [`mark_booked_slots`]; for "any available" the generated
//! slots are the answer.

use crate::format::hhmm;
use crate::operating_hours::{DayHours, OperatingHours};
use crate::types::{Appointment, BookingWindow, DurationMinutes};
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime, Time};

/// Step between consecutive candidate slot starts.
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Why a slot cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotUnavailableReason {
    /// The slot starts before the salon-local current time.
    PastTime,
    /// The employee already has a blocking appointment in this window.
    AlreadyBooked,
}

impl SlotUnavailableReason {
    /// Returns the caller-displayable message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::PastTime => "Past time slot",
            Self::AlreadyBooked => "Already booked",
        }
    }
}

impl std::fmt::Display for SlotUnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A discrete bookable window on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Local start time.
    #[serde(with = "hhmm")]
    pub start_time: Time,
    /// Local end time (`start_time + duration`).
    #[serde(with = "hhmm")]
    pub end_time: Time,
    /// Whether the slot can be booked.
    pub available: bool,
    /// Why the slot is unavailable, when it is.
    pub reason: Option<SlotUnavailableReason>,
}

impl TimeSlot {
    const fn available(start_time: Time, end_time: Time) -> Self {
        Self {
            start_time,
            end_time,
            available: true,
            reason: None,
        }
    }

    const fn mark_unavailable(&mut self, reason: SlotUnavailableReason) {
        self.available = false;
        self.reason = Some(reason);
    }

    /// Returns this slot's window on `date`.
    #[must_use]
    pub const fn window_on(&self, date: Date) -> BookingWindow {
        BookingWindow::new(
            PrimitiveDateTime::new(date, self.start_time),
            PrimitiveDateTime::new(date, self.end_time),
        )
    }
}

/// Minutes elapsed since local midnight.
#[must_use]
pub fn minutes_since_midnight(time: Time) -> u32 {
    u32::from(time.hour()) * 60 + u32::from(time.minute())
}

/// The local time `minutes` after midnight, if it falls within the day.
#[must_use]
pub fn time_from_minutes(minutes: u32) -> Option<Time> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    let hour: u8 = u8::try_from(minutes / 60).ok()?;
    let minute: u8 = u8::try_from(minutes % 60).ok()?;
    Time::from_hms(hour, minute, 0).ok()
}

/// Generates the ordered candidate slots for one day.
///
/// # Arguments
///
/// * `date` - The salon-local calendar date
/// * `day` - That date's operating window
/// * `duration` - The service duration
/// * `now` - The salon-local current time
///
/// # Returns
///
/// Slots in ascending start order. Slots before `now` are unavailable with
/// reason `PastTime`; all others are provisionally available.
#[must_use]
pub fn generate_slots(
    date: Date,
    day: &DayHours,
    duration: DurationMinutes,
    now: PrimitiveDateTime,
) -> Vec<TimeSlot> {
    if !day.is_open {
        return Vec::new();
    }

    let open: u32 = minutes_since_midnight(day.start_time);
    let close: u32 = minutes_since_midnight(day.end_time);
    let length: u32 = u32::from(duration.get());

    let mut slots: Vec<TimeSlot> = Vec::new();
    let mut cursor: u32 = open;

    while cursor + length <= close {
        // close < 24:00, so both ends are representable
        let (Some(start_time), Some(end_time)) =
            (time_from_minutes(cursor), time_from_minutes(cursor + length))
        else {
            break;
        };

        let mut slot: TimeSlot = TimeSlot::available(start_time, end_time);
        if is_past(date, start_time, now) {
            slot.mark_unavailable(SlotUnavailableReason::PastTime);
        }
        slots.push(slot);

        cursor += SLOT_INTERVAL_MINUTES;
    }

    slots
}

/// Generates the slots for `date` using the matching weekday of `hours`.
#[must_use]
pub fn generate_slots_for_date(
    date: Date,
    hours: &OperatingHours,
    duration: DurationMinutes,
    now: PrimitiveDateTime,
) -> Vec<TimeSlot> {
    generate_slots(date, hours.for_weekday(date.weekday()), duration, now)
}

/// Marks every still-available slot that collides with a blocking appointment.
///
/// Slots already unavailable keep their original reason. Appointments that do
/// not block time (cancelled, completed) are ignored.
pub fn mark_booked_slots(slots: &mut [TimeSlot], date: Date, appointments: &[Appointment]) {
    for slot in slots.iter_mut().filter(|slot| slot.available) {
        let window: BookingWindow = slot.window_on(date);
        if appointments
            .iter()
            .any(|appointment| appointment.blocks(&window))
        {
            slot.mark_unavailable(SlotUnavailableReason::AlreadyBooked);
        }
    }
}

/// Generates one employee's slots for a day, pre-marked against their bookings.
///
/// This is the computation behind the ledger's employee time slot query.
#[must_use]
pub fn employee_time_slots(
    date: Date,
    hours: &OperatingHours,
    duration: DurationMinutes,
    now: PrimitiveDateTime,
    appointments: &[Appointment],
) -> Vec<TimeSlot> {
    let mut slots: Vec<TimeSlot> = generate_slots_for_date(date, hours, duration, now);
    mark_booked_slots(&mut slots, date, appointments);
    slots
}

/// Days strictly before today are entirely past; on today only earlier starts are.
fn is_past(date: Date, start_time: Time, now: PrimitiveDateTime) -> bool {
    date < now.date() || (date == now.date() && start_time < now.time())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::AppointmentStatus;
    use time::macros::{date, datetime, time};

    fn thirty() -> DurationMinutes {
        DurationMinutes::new(30).unwrap()
    }

    fn far_past_now() -> PrimitiveDateTime {
        datetime!(2020-01-01 00:00)
    }

    fn appointment(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Appointment {
        Appointment {
            appointment_id: 1,
            salon_id: 1,
            employee_id: Some(7),
            service_id: 3,
            customer_id: 99,
            scheduled_start: start,
            scheduled_end: end,
            status: AppointmentStatus::Confirmed,
        }
    }

    #[test]
    fn test_closed_day_has_no_slots() {
        let slots = generate_slots(
            date!(2026 - 03 - 02),
            &DayHours::closed(),
            thirty(),
            far_past_now(),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_one_hour_window_thirty_minute_service_gives_two_slots() {
        // 2026-03-02 is a Monday
        let day: DayHours = DayHours::open(time!(09:00), time!(10:00));
        let slots = generate_slots(date!(2026 - 03 - 02), &day, thirty(), far_past_now());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_time, time!(09:00));
        assert_eq!(slots[0].end_time, time!(09:30));
        assert_eq!(slots[1].start_time, time!(09:30));
        assert_eq!(slots[1].end_time, time!(10:00));
        assert!(slots.iter().all(|s| s.available && s.reason.is_none()));
    }

    #[test]
    fn test_long_service_drops_spilling_slots() {
        let day: DayHours = DayHours::open(time!(09:00), time!(11:00));
        let ninety: DurationMinutes = DurationMinutes::new(90).unwrap();
        let slots = generate_slots(date!(2026 - 03 - 02), &day, ninety, far_past_now());

        let starts: Vec<Time> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![time!(09:00), time!(09:30)]);
        assert!(slots.iter().all(|s| s.end_time <= time!(11:00)));
    }

    #[test]
    fn test_service_longer_than_window_gives_nothing() {
        let day: DayHours = DayHours::open(time!(09:00), time!(09:45));
        let hour: DurationMinutes = DurationMinutes::new(60).unwrap();
        assert!(generate_slots(date!(2026 - 03 - 02), &day, hour, far_past_now()).is_empty());
    }

    #[test]
    fn test_slots_respect_window_bounds() {
        let day: DayHours = DayHours::open(time!(08:15), time!(17:50));
        let duration: DurationMinutes = DurationMinutes::new(45).unwrap();
        let slots = generate_slots(date!(2026 - 03 - 02), &day, duration, far_past_now());

        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.start_time >= time!(08:15));
            assert!(
                minutes_since_midnight(slot.start_time) + 45
                    <= minutes_since_midnight(time!(17:50))
            );
        }
        assert_eq!(slots.last().unwrap().start_time, time!(16:45));
    }

    #[test]
    fn test_today_past_slots_unavailable() {
        let day: DayHours = DayHours::open(time!(09:00), time!(12:00));
        let now: PrimitiveDateTime = datetime!(2026-03-02 10:10);
        let slots = generate_slots(date!(2026 - 03 - 02), &day, thirty(), now);

        for slot in &slots {
            if slot.start_time < now.time() {
                assert!(!slot.available);
                assert_eq!(slot.reason, Some(SlotUnavailableReason::PastTime));
            } else {
                assert!(slot.available);
            }
        }
        let first_open = slots.iter().find(|s| s.available).unwrap();
        assert_eq!(first_open.start_time, time!(10:30));
    }

    #[test]
    fn test_slot_starting_exactly_now_is_available() {
        let day: DayHours = DayHours::open(time!(09:00), time!(11:00));
        let now: PrimitiveDateTime = datetime!(2026-03-02 10:00);
        let slots = generate_slots(date!(2026 - 03 - 02), &day, thirty(), now);

        let at_ten = slots.iter().find(|s| s.start_time == time!(10:00)).unwrap();
        assert!(at_ten.available);
    }

    #[test]
    fn test_future_day_ignores_time_of_now() {
        let day: DayHours = DayHours::open(time!(09:00), time!(11:00));
        let now: PrimitiveDateTime = datetime!(2026-03-02 23:00);
        let slots = generate_slots(date!(2026 - 03 - 03), &day, thirty(), now);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_earlier_day_is_entirely_past() {
        let day: DayHours = DayHours::open(time!(09:00), time!(11:00));
        let now: PrimitiveDateTime = datetime!(2026-03-02 08:00);
        let slots = generate_slots(date!(2026 - 03 - 01), &day, thirty(), now);
        assert!(slots.iter().all(|s| !s.available));
    }

    #[test]
    fn test_weekday_lookup_uses_local_date() {
        let mut hours: OperatingHours = OperatingHours::default_window();
        hours.sunday = DayHours::closed();

        // 2026-03-08 is a Sunday
        let sunday = generate_slots_for_date(date!(2026 - 03 - 08), &hours, thirty(), far_past_now());
        let monday = generate_slots_for_date(date!(2026 - 03 - 09), &hours, thirty(), far_past_now());
        assert!(sunday.is_empty());
        assert_eq!(monday.len(), 18);
    }

    #[test]
    fn test_booked_slots_marked_unavailable() {
        let hours: OperatingHours =
            OperatingHours::uniform(DayHours::open(time!(09:00), time!(11:00)));
        let booked: Vec<Appointment> = vec![appointment(
            datetime!(2026-03-02 09:30),
            datetime!(2026-03-02 10:15),
        )];

        let slots = employee_time_slots(
            date!(2026 - 03 - 02),
            &hours,
            thirty(),
            far_past_now(),
            &booked,
        );

        let unavailable: Vec<Time> = slots
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.start_time)
            .collect();
        assert_eq!(unavailable, vec![time!(09:30), time!(10:00)]);
        assert!(
            slots
                .iter()
                .filter(|s| !s.available)
                .all(|s| s.reason == Some(SlotUnavailableReason::AlreadyBooked))
        );
    }

    #[test]
    fn test_cancelled_appointments_do_not_block() {
        let hours: OperatingHours =
            OperatingHours::uniform(DayHours::open(time!(09:00), time!(10:00)));
        let mut cancelled: Appointment =
            appointment(datetime!(2026-03-02 09:00), datetime!(2026-03-02 10:00));
        cancelled.status = AppointmentStatus::Cancelled;

        let slots = employee_time_slots(
            date!(2026 - 03 - 02),
            &hours,
            thirty(),
            far_past_now(),
            &[cancelled],
        );
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_past_reason_wins_over_booked() {
        let hours: OperatingHours =
            OperatingHours::uniform(DayHours::open(time!(09:00), time!(10:00)));
        let booked = [appointment(
            datetime!(2026-03-02 09:00),
            datetime!(2026-03-02 09:30),
        )];

        let slots = employee_time_slots(
            date!(2026 - 03 - 02),
            &hours,
            thirty(),
            datetime!(2026-03-02 09:45),
            &booked,
        );
        assert_eq!(slots[0].reason, Some(SlotUnavailableReason::PastTime));
    }

    #[test]
    fn test_minute_conversions() {
        assert_eq!(minutes_since_midnight(time!(13:45)), 825);
        assert_eq!(time_from_minutes(825), Some(time!(13:45)));
        assert_eq!(time_from_minutes(1440), None);
    }
}
