//! Treatment (guidance) handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use clinic_models::{NewTreatment, TreatmentChanges};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, JsonBody};
use crate::handlers::MessageResponse;

/// POST /create_guidance
pub async fn create_treatment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    JsonBody(input): JsonBody<NewTreatment>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.treatments.create(input).await?))
}

/// GET /guidance_list
pub async fn list_treatments(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.treatments.list().await?))
}

/// GET /treatment/:treatmentId
pub async fn get_treatment(
    State(state): State<AppState>,
    Path(treatment_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.treatments.get(&treatment_id).await?))
}

/// PUT /treatment/:treatmentId
pub async fn update_treatment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(treatment_id): Path<String>,
    JsonBody(changes): JsonBody<TreatmentChanges>,
) -> ApiResult<impl IntoResponse> {
    let treatment = state
        .services
        .treatments
        .update(&treatment_id, changes)
        .await?;
    Ok(Json(treatment))
}

/// DELETE /treatment/:treatmentId
pub async fn delete_treatment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(treatment_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.services.treatments.delete(&treatment_id).await?;
    Ok(Json(MessageResponse::new("Treatment deleted successfully")))
}
