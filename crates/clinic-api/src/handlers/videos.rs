//! Video handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use clinic_models::{NewVideo, Video, VideoChanges};
use serde::Serialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, JsonBody};
use crate::handlers::{MessageResponse, ReorderRequest};

#[derive(Serialize)]
pub struct VideoResponse {
    success: bool,
    message: &'static str,
    video: Video,
}

/// POST /upload_video
pub async fn create_video(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    JsonBody(input): JsonBody<NewVideo>,
) -> ApiResult<impl IntoResponse> {
    let video = state.services.videos.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(VideoResponse {
            success: true,
            message: "Video uploaded successfully",
            video,
        }),
    ))
}

/// GET /list_videos
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.videos.list().await?))
}

/// GET /video/:slug
pub async fn get_video(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.videos.get(&slug).await?))
}

/// PUT /video/:slug
pub async fn update_video(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
    JsonBody(changes): JsonBody<VideoChanges>,
) -> ApiResult<impl IntoResponse> {
    let video = state.services.videos.update(&slug, changes).await?;
    Ok(Json(VideoResponse {
        success: true,
        message: "Video updated successfully",
        video,
    }))
}

/// DELETE /video/:slug
pub async fn delete_video(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.services.videos.delete(&slug).await?;
    Ok(Json(MessageResponse::new("Video deleted successfully")))
}

/// POST /update-order
pub async fn reorder_videos(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    JsonBody(body): JsonBody<ReorderRequest>,
) -> ApiResult<impl IntoResponse> {
    state.services.videos.reorder(&body.ids()).await?;
    Ok(Json(MessageResponse::new("Video sequence updated successfully")))
}
