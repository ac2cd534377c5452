//! Result type aliases

use crate::error::{ClinicError, ValidationErrors};

/// Standard result type for clinic operations
pub type ClinicResult<T> = Result<T, ClinicError>;

/// Result type for contract validation
pub type ValidationResult = Result<(), ValidationErrors>;
