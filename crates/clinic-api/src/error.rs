//! API error handling
//!
//! Every failure leaves the API as `{ "error": <code>, "message": <text> }`
//! with the status mapped from the underlying error.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinic_core::error::ClinicError;
use serde::Serialize;
use tracing::{debug, error};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by a service
    Service(ClinicError),
    /// The request body could not be read at all
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Service(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Service(err) => {
                if status.is_server_error() {
                    error!(error = %err, "Request failed");
                } else {
                    debug!(error = %err, status = status.as_u16(), "Request rejected");
                }
                let fields = match err {
                    ClinicError::Validation(errors) => errors.errors.clone(),
                    _ => BTreeMap::new(),
                };
                ErrorBody {
                    error: err.error_code(),
                    message: err.public_message(),
                    fields,
                }
            }
            ApiError::BadRequest(msg) => {
                debug!(message = %msg, "Malformed request");
                ErrorBody {
                    error: "bad_request",
                    message: msg.clone(),
                    fields: BTreeMap::new(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_service_error() {
        let err = ApiError::from(ClinicError::not_found("Album", "id", "x"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = ApiError::from(ClinicError::invalid("title", "Title is required"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(ClinicError::upstream("gateway", "timeout"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request() {
        let err = ApiError::bad_request("Invalid JSON");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
