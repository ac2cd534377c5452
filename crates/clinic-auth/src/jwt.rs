//! JWT authentication
//!
//! Tokens are HS256-signed and carry the user's id, email and role.

use chrono::Utc;
use clinic_core::error::ClinicError;
use clinic_models::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::permissions::CurrentUser;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn into_user(self) -> CurrentUser {
        CurrentUser::new(self.sub, self.email, self.role)
    }
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

impl From<JwtError> for ClinicError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(msg) => ClinicError::Internal(msg),
            JwtError::Missing => ClinicError::unauthorized("Authorization token required"),
            JwtError::Expired => ClinicError::unauthorized("Token is expired"),
            JwtError::Invalid(_) => ClinicError::unauthorized("Invalid token"),
        }
    }
}

/// JWT service for creating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_seconds: i64,
}

impl JwtService {
    pub fn new(secret: &[u8], expires_in_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expires_in_seconds,
        }
    }

    pub fn from_config(config: &clinic_core::config::AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.token_expiration_seconds as i64,
        )
    }

    /// Issue a token for a user using the configured lifetime
    pub fn create_token(&self, user: &CurrentUser) -> Result<String, JwtError> {
        self.create_token_expiring(user, self.expires_in_seconds)
    }

    pub fn create_token_expiring(
        &self,
        user: &CurrentUser,
        expires_in_seconds: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: now + expires_in_seconds,
            iat: now,
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        if token.is_empty() {
            return Err(JwtError::Missing);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        debug!(sub = %token_data.claims.sub, role = %token_data.claims.role, "Token accepted");
        Ok(token_data.claims)
    }

    /// Resolve the principal behind an `Authorization` header value
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<CurrentUser, JwtError> {
        let header = authorization.ok_or(JwtError::Missing)?;
        let token = extract_bearer_token(header).ok_or(JwtError::Missing)?;
        Ok(self.validate_token(token)?.into_user())
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let scheme = authorization.get(..7)?;
    if scheme.eq_ignore_ascii_case("bearer ") {
        Some(authorization[7..].trim())
    } else {
        None
    }
}
