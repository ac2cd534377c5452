//! Doctor profile handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use clinic_core::error::ClinicError;
use clinic_models::{NewProfile, ProfileChanges};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};
use crate::form::FormData;
use crate::handlers::MessageResponse;

const PHOTO_FIELD: &str = "profilePhoto";

/// Create a doctor profile
///
/// POST /create-profile
pub async fn create_profile(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let photo = form.take_file(PHOTO_FIELD);
    form.fold_chambers();
    let input: NewProfile = form.parse()?;

    let profile = state.services.profiles.create(input, photo).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /doctors
pub async fn list_doctors(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.profiles.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    day: Option<String>,
}

/// Doctors consulting on a weekday (0 = Sunday), today by default
///
/// GET /availableDoctors?day=N
pub async fn available_doctors(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<impl IntoResponse> {
    let day = match query.day.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            raw.parse::<u8>()
                .map_err(|_| ClinicError::invalid("day", "Day must be between 0 and 6"))?,
        ),
        None => None,
    };

    Ok(Json(state.services.profiles.available_on(day).await?))
}

/// GET /doctor/:profileId
pub async fn get_doctor(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(profile_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.profiles.get(&profile_id).await?))
}

/// Update profile fields; a `profilePhoto` file replaces the current photo
///
/// PUT /doctor/:profileId
pub async fn update_doctor(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(profile_id): Path<String>,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let photo = form.take_file(PHOTO_FIELD);
    form.fold_chambers();
    let changes: ProfileChanges = form.parse()?;

    let profile = state
        .services
        .profiles
        .update(&profile_id, changes, photo)
        .await?;
    Ok(Json(profile))
}

/// DELETE /doctor/:profileId
pub async fn delete_doctor(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(profile_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.services.profiles.delete(&profile_id).await?;
    Ok(Json(MessageResponse::new("Profile deleted successfully")))
}
