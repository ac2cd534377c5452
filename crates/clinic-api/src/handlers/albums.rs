//! Photo album handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use clinic_models::{Album, AlbumChanges, NewAlbum};
use serde::Serialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, JsonBody};
use crate::form::FormData;
use crate::handlers::{MessageResponse, ReorderRequest};

const IMAGES_FIELD: &str = "images";

#[derive(Serialize)]
pub struct AlbumResponse {
    message: &'static str,
    album: Album,
}

/// Create an album from a name and one or more `images` files
///
/// POST /upload-album
pub async fn create_album(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let images = form.take_files(IMAGES_FIELD);
    let input: NewAlbum = form.parse()?;

    let album = state.services.albums.create(input, images).await?;
    Ok((
        StatusCode::CREATED,
        Json(AlbumResponse {
            message: "Album created successfully",
            album,
        }),
    ))
}

/// GET /albums
pub async fn list_albums(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.albums.list().await?))
}

/// GET /album/:albumId
pub async fn get_album(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.albums.get(&album_id).await?))
}

/// Rename, drop `removedImages`, append `images`, apply `newImageOrder`
///
/// PUT /album/:albumId
pub async fn update_album(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(album_id): Path<String>,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let images = form.take_files(IMAGES_FIELD);
    for field in ["removedImages", "newImageOrder"] {
        form.decode_json(field);
        form.ensure_list(field);
    }
    let changes: AlbumChanges = form.parse()?;

    let album = state
        .services
        .albums
        .update(&album_id, changes, images)
        .await?;
    Ok(Json(AlbumResponse {
        message: "Album updated successfully",
        album,
    }))
}

/// DELETE /album/:albumId
pub async fn delete_album(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(album_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.services.albums.delete(&album_id).await?;
    Ok(Json(MessageResponse::new(
        "Album and its images deleted successfully",
    )))
}

/// POST /update-album-order
pub async fn reorder_albums(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    JsonBody(body): JsonBody<ReorderRequest>,
) -> ApiResult<impl IntoResponse> {
    state.services.albums.reorder(&body.ids()).await?;
    Ok(Json(MessageResponse::new("Albums sequence updated successfully")))
}
