//! Core error types for the clinic backend
//!
//! Every layer converts its own failures into [`ClinicError`], which carries the
//! HTTP status mapping used by the API crate.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Core error type for all clinic operations
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("{entity} not found with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A referenced record is missing, e.g. a blog category or a booked doctor.
    #[error("{message}")]
    MissingReference { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Upstream error: {service} - {message}")]
    Upstream { service: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClinicError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl fmt::Display) -> Self {
        ClinicError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn missing_reference(message: impl Into<String>) -> Self {
        ClinicError::MissingReference {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ClinicError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        ClinicError::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        ClinicError::Validation(errors)
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ClinicError::NotFound { .. } | ClinicError::MissingReference { .. } => 404,
            ClinicError::Unauthorized { .. } => 401,
            ClinicError::Validation(_) => 400,
            ClinicError::Upstream { .. } => 500,
            ClinicError::Database(_) | ClinicError::Internal(_) | ClinicError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClinicError::NotFound { .. } => "not_found",
            ClinicError::MissingReference { .. } => "missing_reference",
            ClinicError::Unauthorized { .. } => "unauthorized",
            ClinicError::Validation(_) => "validation_failed",
            ClinicError::Upstream { .. } => "upstream_error",
            ClinicError::Database(_) => "database_error",
            ClinicError::Internal(_) => "internal_error",
            ClinicError::Config(_) => "configuration_error",
        }
    }

    /// Message safe to show to API clients. Server-side failures are collapsed
    /// into a generic text; the detail goes to the log instead.
    pub fn public_message(&self) -> String {
        match self {
            ClinicError::NotFound { entity, .. } => format!("{} not found", entity),
            ClinicError::Validation(errors) => errors.full_messages().join(", "),
            ClinicError::MissingReference { message } | ClinicError::Unauthorized { message } => {
                message.clone()
            }
            ClinicError::Upstream { .. } => "Failed to process the uploaded file".to_string(),
            ClinicError::Database(_) | ClinicError::Internal(_) | ClinicError::Config(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

/// Validation errors collection
///
/// Field keys are the wire names of the offending inputs (`title`,
/// `chambers[1].location`); messages are complete sentences naming the field.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// Turn the collection into a result, `Ok` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for field_messages in self.errors.values() {
            messages.extend(field_messages.iter().cloned());
        }
        messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
