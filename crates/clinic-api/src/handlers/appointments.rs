//! Appointment handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use clinic_models::NewAppointment;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, JsonBody};

/// Public booking form
///
/// POST /book_appointment
pub async fn book_appointment(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewAppointment>,
) -> ApiResult<impl IntoResponse> {
    let appointment = state.services.appointments.book(input).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Admins see every appointment, doctors the ones booked with them
///
/// GET /appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.appointments.list_for(&user).await?))
}
