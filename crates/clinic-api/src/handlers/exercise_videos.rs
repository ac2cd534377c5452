//! Exercise video handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use clinic_models::{NewVideo, VideoChanges};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, JsonBody};
use crate::form::FormData;
use crate::handlers::{MessageResponse, ReorderRequest};

const THUMBNAIL_FIELD: &str = "thumbnail";

/// POST /upload-exercise-video
pub async fn create_exercise_video(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let thumbnail = form.take_file(THUMBNAIL_FIELD);
    let input: NewVideo = form.parse()?;

    let video = state
        .services
        .exercise_videos
        .create(input, thumbnail)
        .await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// GET /list-exercise-videos
pub async fn list_exercise_videos(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.exercise_videos.list().await?))
}

/// GET /exercise-video/:slug
pub async fn get_exercise_video(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.exercise_videos.get(&slug).await?))
}

/// PUT /exercise-video/:slug
pub async fn update_exercise_video(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let thumbnail = form.take_file(THUMBNAIL_FIELD);
    let changes: VideoChanges = form.parse()?;

    let video = state
        .services
        .exercise_videos
        .update(&slug, changes, thumbnail)
        .await?;
    Ok(Json(video))
}

/// DELETE /exercise-video/:slug
pub async fn delete_exercise_video(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.services.exercise_videos.delete(&slug).await?;
    Ok(Json(MessageResponse::new("Video deleted successfully")))
}

/// POST /update-exercise-video-order
pub async fn reorder_exercise_videos(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    JsonBody(body): JsonBody<ReorderRequest>,
) -> ApiResult<impl IntoResponse> {
    state.services.exercise_videos.reorder(&body.ids()).await?;
    Ok(Json(MessageResponse::new("Video sequence updated successfully")))
}
