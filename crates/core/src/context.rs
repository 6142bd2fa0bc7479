// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::ledger::BookingLedger;
use salon_booking_domain::{
    DateRange, DurationMinutes, HoursResolution, OperatingHours, Salon, Service,
    resolve_stored_operating_hours,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Everything a single booking request computes against.
///
/// Built once per request from the ledger and an instant, then passed
/// explicitly to every calculator. It is never shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingContext {
    salon: Salon,
    service: Service,
    hours: HoursResolution,
    now: PrimitiveDateTime,
}

impl BookingContext {
    /// Creates a context from already-loaded parts.
    ///
    /// # Arguments
    ///
    /// * `salon` - The salon offering the service
    /// * `service` - The service being booked
    /// * `hours` - The resolved operating hours
    /// * `now` - The salon-local current time
    #[must_use]
    pub const fn new(
        salon: Salon,
        service: Service,
        hours: HoursResolution,
        now: PrimitiveDateTime,
    ) -> Self {
        Self {
            salon,
            service,
            hours,
            now,
        }
    }

    /// Loads the service and its salon, resolves the salon's hours, and
    /// converts `instant` to the salon's local wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the service or salon is missing, or if the instant
    /// cannot be expressed in the salon's timezone.
    pub fn load<L: BookingLedger + ?Sized>(
        ledger: &mut L,
        service_id: i64,
        instant: OffsetDateTime,
    ) -> Result<Self, CoreError> {
        let service: Service = ledger.service(service_id)?;
        let salon: Salon = ledger.salon(service.salon_id)?;
        let hours: HoursResolution = resolve_stored_operating_hours(salon.operating_hours.as_deref());
        let now: PrimitiveDateTime = salon.timezone.local_now(instant)?;
        Ok(Self::new(salon, service, hours, now))
    }

    /// Like [`Self::load`], but also checks the service belongs to `salon_id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::SalonMismatch` if the service is offered elsewhere.
    pub fn load_for_salon<L: BookingLedger + ?Sized>(
        ledger: &mut L,
        salon_id: i64,
        service_id: i64,
        instant: OffsetDateTime,
    ) -> Result<Self, CoreError> {
        let context: Self = Self::load(ledger, service_id, instant)?;
        if context.salon.salon_id != salon_id {
            return Err(CoreError::SalonMismatch {
                expected: salon_id,
                actual: context.salon.salon_id,
            });
        }
        Ok(context)
    }

    /// The salon.
    #[must_use]
    pub const fn salon(&self) -> &Salon {
        &self.salon
    }

    /// The service being booked.
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    /// The service duration.
    #[must_use]
    pub const fn duration(&self) -> DurationMinutes {
        self.service.duration
    }

    /// How the operating hours were resolved.
    #[must_use]
    pub const fn hours_resolution(&self) -> &HoursResolution {
        &self.hours
    }

    /// The operating hours in effect, falling back to the default window.
    #[must_use]
    pub const fn operating_hours(&self) -> OperatingHours {
        self.hours.hours_or_default()
    }

    /// The salon-local current time.
    #[must_use]
    pub const fn now(&self) -> PrimitiveDateTime {
        self.now
    }

    /// The salon-local calendar date.
    #[must_use]
    pub const fn today(&self) -> Date {
        self.now.date()
    }

    /// The requested date range, defaulting to 30 days forward from today.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or too long.
    pub fn date_range(&self, start: Option<Date>, end: Option<Date>) -> Result<DateRange, CoreError> {
        Ok(DateRange::from_bounds(start, end, self.today())?)
    }
}
