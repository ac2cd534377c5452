//! Blog post handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use clinic_models::{BlogChanges, NewBlogPost};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, JsonBody};
use crate::form::FormData;
use crate::handlers::{MessageResponse, ReorderRequest};

const COVER_FIELD: &str = "coverPhoto";

/// Write a post as the signed-in doctor
///
/// POST /write-blog
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let cover = form.take_file(COVER_FIELD);
    form.decode_json("editorData");
    let input: NewBlogPost = form.parse()?;

    let post = state.services.blogs.create(&user, input, cover).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /blogs
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.blogs.list().await?))
}

/// GET /blog/:slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.blogs.get_by_slug(&slug).await?))
}

/// PUT /blog/:slug
pub async fn update_post(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
    mut form: FormData,
) -> ApiResult<impl IntoResponse> {
    let cover = form.take_file(COVER_FIELD);
    let remove_cover_image = form.take_flag("removeCoverImage");
    form.decode_json("editorData");
    let parsed: BlogChanges = form.parse()?;
    let changes = BlogChanges {
        remove_cover_image,
        ..parsed
    };

    let post = state.services.blogs.update(&slug, changes, cover).await?;
    Ok(Json(post))
}

/// DELETE /blog/:blogId
pub async fn delete_post(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(blog_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.services.blogs.delete(&blog_id).await?;
    Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}

/// POST /update-blog-order
pub async fn reorder_posts(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    JsonBody(body): JsonBody<ReorderRequest>,
) -> ApiResult<impl IntoResponse> {
    state.services.blogs.reorder(&body.ids()).await?;
    Ok(Json(MessageResponse::new("Blogs sequence updated successfully")))
}
