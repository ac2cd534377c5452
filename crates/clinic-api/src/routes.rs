//! API routes
//!
//! Paths are the ones the public site and the admin panel already call.
//! Reads are public except single profiles; mutations need a bearer token.

use axum::{
    routing::{get, post},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{albums, appointments, blogs, exercise_videos, profiles, treatments, videos};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(profile_routes())
        .merge(appointment_routes())
        .merge(album_routes())
        .merge(blog_routes())
        .merge(treatment_routes())
        .merge(video_routes())
        .merge(exercise_video_routes())
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/create-profile", post(profiles::create_profile))
        .route("/doctors", get(profiles::list_doctors))
        .route("/availableDoctors", get(profiles::available_doctors))
        .route(
            "/doctor/:profileId",
            get(profiles::get_doctor)
                .put(profiles::update_doctor)
                .delete(profiles::delete_doctor),
        )
}

fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/book_appointment", post(appointments::book_appointment))
        .route("/appointments", get(appointments::list_appointments))
}

fn album_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-album", post(albums::create_album))
        .route("/albums", get(albums::list_albums))
        .route(
            "/album/:albumId",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )
        .route("/update-album-order", post(albums::reorder_albums))
}

fn blog_routes() -> Router<AppState> {
    // `/blog/:slug` and `/blog/:blogId` are the same route; DELETE takes an id
    Router::new()
        .route("/write-blog", post(blogs::create_post))
        .route("/blogs", get(blogs::list_posts))
        .route(
            "/blog/:slug",
            get(blogs::get_post)
                .put(blogs::update_post)
                .delete(blogs::delete_post),
        )
        .route("/update-blog-order", post(blogs::reorder_posts))
}

fn treatment_routes() -> Router<AppState> {
    Router::new()
        .route("/create_guidance", post(treatments::create_treatment))
        .route("/guidance_list", get(treatments::list_treatments))
        .route(
            "/treatment/:treatmentId",
            get(treatments::get_treatment)
                .put(treatments::update_treatment)
                .delete(treatments::delete_treatment),
        )
}

fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/upload_video", post(videos::create_video))
        .route("/list_videos", get(videos::list_videos))
        .route(
            "/video/:slug",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/update-order", post(videos::reorder_videos))
}

fn exercise_video_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/upload-exercise-video",
            post(exercise_videos::create_exercise_video),
        )
        .route(
            "/list-exercise-videos",
            get(exercise_videos::list_exercise_videos),
        )
        .route(
            "/exercise-video/:slug",
            get(exercise_videos::get_exercise_video)
                .put(exercise_videos::update_exercise_video)
                .delete(exercise_videos::delete_exercise_video),
        )
        .route(
            "/update-exercise-video-order",
            post(exercise_videos::reorder_exercise_videos),
        )
}
