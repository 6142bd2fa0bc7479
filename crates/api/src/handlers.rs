// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for catalog setup, availability and booking.
//!
//! Handlers that depend on the current time take it as an absolute instant;
//! the salon's timezone turns it into the local "now" used by every rule.

use salon_booking::{
    BookingContext, RejectionKind, ValidationOutcome, any_available_availability,
    any_available_slots, commit_booking, employee_availability, employee_time_slots,
    resolve_salon_hours, validate_with_ledger,
};
use salon_booking_domain::format::{parse_local_date, parse_local_datetime};
use salon_booking_domain::{
    Appointment, AssignmentMode, BookingRequest, DateRange, DayAvailability, DomainError,
    DurationMinutes, Employee, HoursEncoding, HoursResolution, Salon, SalonTimezone, Service,
    TimeSlot, resolve_stored_operating_hours, validate_name, validate_timezone_or_default,
};
use salon_booking_persistence::SqlitePersistence;
use serde_json::Value;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::{Level, debug, info, warn};

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_rejection,
};
use crate::request_response::{
    AppointmentResponse, AvailabilityQuery, AvailabilityResponse, BookingRequestBody,
    CreateEmployeeRequest, CreateEmployeeResponse, CreateSalonRequest, CreateSalonResponse,
    CreateServiceRequest, CreateServiceResponse, OperatingHoursResponse, SlotsQuery,
    SlotsResponse, ValidateBookingResponse, slots_to_info,
};

// ============================================================================
// Catalog
// ============================================================================

/// Creates a salon.
///
/// The operating hours are stored exactly as supplied: a JSON string is kept
/// as its text, any other JSON value as its serialized form. They are
/// resolved on every read, so an unreadable value is accepted and reported
/// through `hours_configured`.
///
/// # Errors
///
/// Returns an error if the name is blank, the timezone is unknown, or the
/// insert fails.
pub fn create_salon(
    persistence: &mut SqlitePersistence,
    request: &CreateSalonRequest,
) -> Result<CreateSalonResponse, ApiError> {
    let name: String = validate_name(&request.name).map_err(translate_domain_error)?;
    let timezone: SalonTimezone =
        validate_timezone_or_default(request.timezone.as_deref()).map_err(translate_domain_error)?;

    let raw_hours: Option<String> = match &request.operating_hours {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    };
    let hours_configured: bool = resolve_stored_operating_hours(raw_hours.as_deref()).is_configured();
    if raw_hours.is_some() && !hours_configured {
        warn!(name = %name, "Salon operating hours are in no known encoding; default window applies");
    }

    let salon: Salon = persistence
        .create_salon(&name, &timezone, raw_hours.as_deref())
        .map_err(translate_persistence_error)?;

    Ok(CreateSalonResponse {
        salon_id: salon.salon_id,
        name: salon.name.clone(),
        timezone: salon.timezone.name().to_string(),
        hours_configured,
        message: format!("Created salon '{}'", salon.name),
    })
}

/// Creates an active service.
///
/// # Errors
///
/// Returns an error if the name is blank, the duration is zero, or the salon
/// does not exist.
pub fn create_service(
    persistence: &mut SqlitePersistence,
    request: &CreateServiceRequest,
) -> Result<CreateServiceResponse, ApiError> {
    let name: String = validate_name(&request.name).map_err(translate_domain_error)?;
    let duration: DurationMinutes =
        DurationMinutes::new(request.duration_minutes).map_err(translate_domain_error)?;

    let service: Service = persistence
        .create_service(request.salon_id, &name, duration)
        .map_err(translate_persistence_error)?;

    Ok(CreateServiceResponse {
        service_id: service.service_id,
        salon_id: service.salon_id,
        name: service.name.clone(),
        duration_minutes: service.duration.get(),
        message: format!("Created service '{}' ({})", service.name, service.duration),
    })
}

/// Creates an active employee.
///
/// # Errors
///
/// Returns an error if the name is blank or the salon does not exist.
pub fn create_employee(
    persistence: &mut SqlitePersistence,
    request: &CreateEmployeeRequest,
) -> Result<CreateEmployeeResponse, ApiError> {
    let name: String = validate_name(&request.name).map_err(translate_domain_error)?;

    let employee: Employee = persistence
        .create_employee(request.salon_id, &name)
        .map_err(translate_persistence_error)?;

    Ok(CreateEmployeeResponse {
        employee_id: employee.employee_id,
        salon_id: employee.salon_id,
        name: employee.name.clone(),
        message: format!("Created employee '{}'", employee.name),
    })
}

/// Returns a salon's operating hours as the engine sees them.
///
/// # Errors
///
/// Returns an error if the salon does not exist.
pub fn get_operating_hours(
    persistence: &mut SqlitePersistence,
    salon_id: i64,
) -> Result<OperatingHoursResponse, ApiError> {
    let resolution: HoursResolution =
        resolve_salon_hours(persistence, salon_id).map_err(translate_core_error)?;
    log_hours_resolution(salon_id, &resolution);

    let encoding: Option<HoursEncoding> = match resolution {
        HoursResolution::Resolved { encoding, .. } => Some(encoding),
        HoursResolution::NotConfigured => None,
    };

    Ok(OperatingHoursResponse {
        salon_id,
        configured: resolution.is_configured(),
        encoding,
        hours: resolution.hours_or_default(),
    })
}

// ============================================================================
// Availability
// ============================================================================

/// Day summaries for an "any available" booking at a salon.
///
/// Computed from operating hours alone; no employee calendars are read.
///
/// # Errors
///
/// Returns an error if the service is unknown or offered by another salon, or
/// the date range is invalid.
pub fn get_salon_availability(
    persistence: &mut SqlitePersistence,
    salon_id: i64,
    query: &AvailabilityQuery,
    now: OffsetDateTime,
) -> Result<AvailabilityResponse, ApiError> {
    let context: BookingContext =
        load_context(persistence, Some(salon_id), query.service_id, now)?;
    let range: DateRange = requested_range(&context, query)?;
    let days: Vec<DayAvailability> = any_available_availability(&context, &range);

    Ok(AvailabilityResponse {
        salon_id,
        employee_id: None,
        service_id: query.service_id,
        start_date: range.start(),
        end_date: range.end(),
        days,
    })
}

/// One day's candidate slots for an "any available" booking at a salon.
///
/// # Errors
///
/// Returns an error if the service is unknown or offered by another salon, or
/// the date is malformed.
pub fn get_salon_slots(
    persistence: &mut SqlitePersistence,
    salon_id: i64,
    query: &SlotsQuery,
    now: OffsetDateTime,
) -> Result<SlotsResponse, ApiError> {
    let context: BookingContext =
        load_context(persistence, Some(salon_id), query.service_id, now)?;
    let date: Date = parse_date_field("date", &query.date)?;
    let slots: Vec<TimeSlot> = any_available_slots(&context, date);

    Ok(SlotsResponse {
        salon_id,
        employee_id: None,
        service_id: query.service_id,
        date,
        slots: slots_to_info(&slots),
    })
}

/// Day summaries for one employee, against their committed bookings.
///
/// # Errors
///
/// Returns an error if the employee is unknown or inactive, works at another
/// salon than the service, or the date range is invalid.
pub fn get_employee_availability(
    persistence: &mut SqlitePersistence,
    employee_id: i64,
    query: &AvailabilityQuery,
    now: OffsetDateTime,
) -> Result<AvailabilityResponse, ApiError> {
    let context: BookingContext = load_context(persistence, None, query.service_id, now)?;
    let range: DateRange = requested_range(&context, query)?;
    let days: Vec<DayAvailability> =
        employee_availability(persistence, &context, employee_id, &range)
            .map_err(translate_core_error)?;

    Ok(AvailabilityResponse {
        salon_id: context.salon().salon_id,
        employee_id: Some(employee_id),
        service_id: query.service_id,
        start_date: range.start(),
        end_date: range.end(),
        days,
    })
}

/// One day's slots for one employee, booked windows marked unavailable.
///
/// # Errors
///
/// Returns an error if the employee is unknown or inactive, works at another
/// salon than the service, or the date is malformed.
pub fn get_employee_slots(
    persistence: &mut SqlitePersistence,
    employee_id: i64,
    query: &SlotsQuery,
    now: OffsetDateTime,
) -> Result<SlotsResponse, ApiError> {
    let context: BookingContext = load_context(persistence, None, query.service_id, now)?;
    let date: Date = parse_date_field("date", &query.date)?;
    let slots: Vec<TimeSlot> = employee_time_slots(persistence, &context, employee_id, date)
        .map_err(translate_core_error)?;

    Ok(SlotsResponse {
        salon_id: context.salon().salon_id,
        employee_id: Some(employee_id),
        service_id: query.service_id,
        date,
        slots: slots_to_info(&slots),
    })
}

// ============================================================================
// Booking
// ============================================================================

/// Advisory pre-check of a booking.
///
/// A failed rule is a normal response with `valid: false`, not an error. No
/// lock is held afterwards, so a valid booking can still lose at commit.
///
/// # Errors
///
/// Returns an error if the request cannot be read, or the service or a
/// specific employee does not exist.
pub fn validate_booking(
    persistence: &mut SqlitePersistence,
    body: &BookingRequestBody,
    now: OffsetDateTime,
) -> Result<ValidateBookingResponse, ApiError> {
    let context: BookingContext = load_context(persistence, None, body.service_id, now)?;
    let request: BookingRequest = booking_request(&context, body)?;

    let outcome: ValidationOutcome =
        validate_with_ledger(persistence, &context, &request).map_err(translate_core_error)?;

    Ok(match outcome {
        ValidationOutcome::Accepted => ValidateBookingResponse {
            valid: true,
            reason: None,
            error: None,
        },
        ValidationOutcome::Rejected(rejection) => {
            if rejection.kind == RejectionKind::MalformedRequest {
                warn!(
                    service_id = body.service_id,
                    customer_id = body.customer_id,
                    reason = %rejection.reason,
                    "Malformed booking request; client state is likely stale"
                );
            }
            let reason: String = rejection.reason.clone();
            ValidateBookingResponse {
                valid: false,
                reason: Some(reason),
                error: Some(translate_rejection(rejection).code()),
            }
        }
    })
}

/// Commits a booking. The ledger repeats the overlap check under its write
/// lock, so of two racing commits for the same window exactly one succeeds.
///
/// # Errors
///
/// Returns `ApiError::SlotConflict` if the window was taken, or another error
/// if the booking is in the past, malformed, or references missing rows.
pub fn create_appointment(
    persistence: &mut SqlitePersistence,
    body: &BookingRequestBody,
    now: OffsetDateTime,
) -> Result<AppointmentResponse, ApiError> {
    let context: BookingContext = load_context(persistence, None, body.service_id, now)?;
    let request: BookingRequest = booking_request(&context, body)?;

    let appointment: Appointment =
        commit_booking(persistence, &context, &request).map_err(translate_core_error)?;

    info!(
        appointment_id = appointment.appointment_id,
        employee_id = appointment.employee_id,
        salon_id = appointment.salon_id,
        "Booking committed"
    );

    Ok(AppointmentResponse {
        message: format!("Booked appointment {}", appointment.appointment_id),
        appointment: appointment.into(),
    })
}

/// Cancels a pending or confirmed appointment, freeing its window.
///
/// # Errors
///
/// Returns an error if the appointment does not exist or was already
/// cancelled or completed.
pub fn cancel_appointment(
    persistence: &mut SqlitePersistence,
    appointment_id: i64,
) -> Result<AppointmentResponse, ApiError> {
    let appointment: Appointment = persistence
        .cancel_appointment(appointment_id)
        .map_err(translate_persistence_error)?;

    Ok(AppointmentResponse {
        message: format!("Cancelled appointment {appointment_id}"),
        appointment: appointment.into(),
    })
}

// ============================================================================
// Request parsing
// ============================================================================

fn parse_date_field(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_local_date(value).map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    })
}

fn parse_datetime_field(field: &str, value: &str) -> Result<PrimitiveDateTime, ApiError> {
    parse_local_datetime(value).map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    })
}

/// Loads the request context and logs how the salon's hours were resolved.
/// With `salon_id`, the service must belong to that salon.
fn load_context(
    persistence: &mut SqlitePersistence,
    salon_id: Option<i64>,
    service_id: i64,
    now: OffsetDateTime,
) -> Result<BookingContext, ApiError> {
    let context: BookingContext = match salon_id {
        Some(salon_id) => {
            BookingContext::load_for_salon(persistence, salon_id, service_id, now)
        }
        None => BookingContext::load(persistence, service_id, now),
    }
    .map_err(translate_core_error)?;
    log_hours_resolution(context.salon().salon_id, context.hours_resolution());
    Ok(context)
}

/// Logs the winning hours encoding at `debug`, or the fallback to the
/// default window at `warn`. Returns the level used.
pub(crate) fn log_hours_resolution(salon_id: i64, resolution: &HoursResolution) -> Level {
    match resolution {
        HoursResolution::Resolved { encoding, .. } => {
            debug!(salon_id, encoding = encoding.as_str(), "Resolved operating hours");
            Level::DEBUG
        }
        HoursResolution::NotConfigured => {
            warn!(salon_id, "Operating hours not configured; using default window");
            Level::WARN
        }
    }
}

fn requested_range(
    context: &BookingContext,
    query: &AvailabilityQuery,
) -> Result<DateRange, ApiError> {
    let start: Option<Date> = query
        .start_date
        .as_deref()
        .map(|value| parse_date_field("start_date", value))
        .transpose()?;
    let end: Option<Date> = query
        .end_date
        .as_deref()
        .map(|value| parse_date_field("end_date", value))
        .transpose()?;
    context.date_range(start, end).map_err(translate_core_error)
}

/// Builds the engine's booking request from the wire body.
///
/// An omitted end defaults to start plus the service duration. The employee
/// of an "any" booking is dropped; the ledger assigns one at commit.
fn booking_request(
    context: &BookingContext,
    body: &BookingRequestBody,
) -> Result<BookingRequest, ApiError> {
    let assignment_mode: AssignmentMode =
        body.assignment_mode
            .parse()
            .map_err(|err: DomainError| ApiError::InvalidInput {
                field: String::from("assignment_mode"),
                message: err.to_string(),
            })?;
    let scheduled_start: PrimitiveDateTime =
        parse_datetime_field("scheduled_start", &body.scheduled_start)?;
    let scheduled_end: PrimitiveDateTime = match &body.scheduled_end {
        Some(value) => parse_datetime_field("scheduled_end", value)?,
        None => scheduled_start
            .checked_add(context.duration().as_duration())
            .ok_or_else(|| ApiError::InvalidInput {
                field: String::from("scheduled_start"),
                message: String::from("Start time is out of range"),
            })?,
    };
    let employee_id: Option<i64> = match assignment_mode {
        AssignmentMode::Specific => body.employee_id,
        AssignmentMode::Any => None,
    };

    Ok(BookingRequest {
        employee_id,
        service_id: body.service_id,
        scheduled_start,
        scheduled_end,
        customer_id: body.customer_id,
        assignment_mode,
    })
}
