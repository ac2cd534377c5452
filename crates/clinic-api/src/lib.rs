//! # clinic-api
//!
//! HTTP handlers for the clinic backend.
//!
//! Handlers parse the request, call the matching service and turn the result
//! into JSON. Upload endpoints read `multipart/form-data` through
//! [`form::FormData`]; errors leave as [`error::ApiError`].

pub mod error;
pub mod extractors;
pub mod form;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
