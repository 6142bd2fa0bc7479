// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use salon_booking_api::{
    ApiError, AppointmentResponse, AvailabilityQuery, AvailabilityResponse, BookingRequestBody,
    CreateEmployeeRequest, CreateEmployeeResponse, CreateSalonRequest, CreateSalonResponse,
    CreateServiceRequest, CreateServiceResponse, ErrorCode, OperatingHoursResponse, SlotsQuery,
    SlotsResponse, ValidateBookingResponse, cancel_appointment, create_appointment,
    create_employee, create_salon, create_service, get_employee_availability, get_employee_slots,
    get_operating_hours, get_salon_availability, get_salon_slots, validate_booking,
};
use salon_booking_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Salon Booking Server - HTTP server for salon availability and bookings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,
}

/// Source of the current instant.
type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; booking commits additionally
/// serialize inside `SQLite` so separate processes sharing a file stay safe.
#[derive(Clone)]
struct AppState {
    /// The appointment ledger.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// The clock every time-dependent rule reads.
    clock: Clock,
}

impl AppState {
    fn new(persistence: SqlitePersistence) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            clock: Arc::new(OffsetDateTime::now_utc),
        }
    }

    fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Stable machine-readable code.
    error: ErrorCode,
    /// Caller-displayable message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The stable error code.
    code: ErrorCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let code: ErrorCode = err.code();
        let status: StatusCode = match code {
            ErrorCode::SlotConflict => StatusCode::CONFLICT,
            ErrorCode::PastTime | ErrorCode::MalformedRequest => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/salons` endpoint.
async fn handle_create_salon(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateSalonRequest>,
) -> Result<Json<CreateSalonResponse>, HttpError> {
    info!(name = %req.name, "Handling create_salon request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateSalonResponse = create_salon(&mut persistence, &req)?;
    drop(persistence);

    info!(salon_id = response.salon_id, "Created salon");
    Ok(Json(response))
}

/// Handler for POST `/services` endpoint.
async fn handle_create_service(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<Json<CreateServiceResponse>, HttpError> {
    info!(salon_id = req.salon_id, name = %req.name, "Handling create_service request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateServiceResponse = create_service(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/employees` endpoint.
async fn handle_create_employee(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<Json<CreateEmployeeResponse>, HttpError> {
    info!(salon_id = req.salon_id, name = %req.name, "Handling create_employee request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateEmployeeResponse = create_employee(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/salons/{salon_id}/operating_hours` endpoint.
async fn handle_get_operating_hours(
    AxumState(app_state): AxumState<AppState>,
    Path(salon_id): Path<i64>,
) -> Result<Json<OperatingHoursResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: OperatingHoursResponse = get_operating_hours(&mut persistence, salon_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/salons/{salon_id}/availability` endpoint.
///
/// Day summaries for an "any available" booking.
async fn handle_get_salon_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(salon_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    let now: OffsetDateTime = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityResponse =
        get_salon_availability(&mut persistence, salon_id, &query, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/salons/{salon_id}/slots` endpoint.
async fn handle_get_salon_slots(
    AxumState(app_state): AxumState<AppState>,
    Path(salon_id): Path<i64>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, HttpError> {
    let now: OffsetDateTime = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response: SlotsResponse = get_salon_slots(&mut persistence, salon_id, &query, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/employees/{employee_id}/availability` endpoint.
async fn handle_get_employee_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    let now: OffsetDateTime = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityResponse =
        get_employee_availability(&mut persistence, employee_id, &query, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/employees/{employee_id}/slots` endpoint.
async fn handle_get_employee_slots(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, HttpError> {
    let now: OffsetDateTime = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response: SlotsResponse = get_employee_slots(&mut persistence, employee_id, &query, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bookings/validate` endpoint.
///
/// Advisory only: a failed rule is a 200 with `valid: false`.
async fn handle_validate_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BookingRequestBody>,
) -> Result<Json<ValidateBookingResponse>, HttpError> {
    let now: OffsetDateTime = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response: ValidateBookingResponse = validate_booking(&mut persistence, &req, now)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/appointments` endpoint.
///
/// A lost race is a 409 `slot_conflict`; the client refreshes its slots.
async fn handle_create_appointment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BookingRequestBody>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        service_id = req.service_id,
        employee_id = req.employee_id,
        assignment_mode = %req.assignment_mode,
        start = %req.scheduled_start,
        "Handling create_appointment request"
    );

    let now: OffsetDateTime = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let result: Result<AppointmentResponse, ApiError> =
        create_appointment(&mut persistence, &req, now);
    drop(persistence);

    match result {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            if err.code() == ErrorCode::SlotConflict {
                info!(service_id = req.service_id, "Booking lost to a conflicting appointment");
            } else {
                warn!(service_id = req.service_id, error = %err, "Booking refused");
            }
            Err(err.into())
        }
    }
}

/// Handler for POST `/appointments/{appointment_id}/cancel` endpoint.
async fn handle_cancel_appointment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(appointment_id, "Handling cancel_appointment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AppointmentResponse = cancel_appointment(&mut persistence, appointment_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/salons", post(handle_create_salon))
        .route("/services", post(handle_create_service))
        .route("/employees", post(handle_create_employee))
        .route(
            "/salons/{salon_id}/operating_hours",
            get(handle_get_operating_hours),
        )
        .route(
            "/salons/{salon_id}/availability",
            get(handle_get_salon_availability),
        )
        .route("/salons/{salon_id}/slots", get(handle_get_salon_slots))
        .route(
            "/employees/{employee_id}/availability",
            get(handle_get_employee_availability),
        )
        .route(
            "/employees/{employee_id}/slots",
            get(handle_get_employee_slots),
        )
        .route("/bookings/validate", post(handle_validate_booking))
        .route("/appointments", post(handle_create_appointment))
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handle_cancel_appointment),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Salon Booking Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app: Router = build_router(AppState::new(persistence));

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
