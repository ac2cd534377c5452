//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{header, request::Parts},
    Json,
};
use clinic_auth::{CurrentUser, JwtService};
use clinic_core::config::AppConfig;
use clinic_core::error::ClinicError;
use clinic_services::ClinicServices;
use tracing::debug;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub services: ClinicServices,
    pub jwt: JwtService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(services: ClinicServices, jwt: JwtService, config: AppConfig) -> Self {
        Self {
            services,
            jwt,
            config: Arc::new(config),
        }
    }
}

/// Authenticated user extractor
///
/// Rejects with 401 when the bearer token is absent, malformed or expired.
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match app_state.jwt.authenticate(authorization) {
            Ok(user) => Ok(AuthenticatedUser(user)),
            Err(err) => {
                debug!(error = %err, path = %parts.uri.path(), "Authentication failed");
                Err(ClinicError::from(err).into())
            }
        }
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JSON body whose rejection uses the API error shape
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
