//! Doctor profile contracts

use clinic_core::error::ValidationErrors;
use clinic_models::{ChamberInput, NewProfile, ProfileChanges};
use serde_json::Value;

use crate::base::{
    json_view, validate_entries, validate_fields, Contract, FieldRule, Presence, ValidationResult,
};

pub const PROFILE_RULES: &[FieldRule] = &[
    FieldRule::text("name", "Name"),
    FieldRule::text("designation", "Designation"),
    FieldRule::text("email", "Email"),
    FieldRule::text("phone", "Phone"),
    FieldRule::text("whatsApp", "WhatsApp Number"),
    FieldRule::text("detailsInfo", "Details info about doctor"),
    FieldRule::list("chambers", "At least one location"),
];

pub const CHAMBER_RULES: &[FieldRule] = &[
    FieldRule::text("location", "Location"),
    FieldRule::text("appointmentNumber", "Appointment Number"),
    FieldRule::list("consultationDays", "Consultation Days"),
    FieldRule::text("consultationTime", "Consultation Time"),
];

/// Contract for creating a doctor profile
pub struct CreateProfileContract;

impl Contract<NewProfile> for CreateProfileContract {
    fn validate(&self, input: &NewProfile) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), PROFILE_RULES, Presence::Required, &mut errors);
        validate_chambers(&input.chambers, &mut errors);
        validate_email(input.email.as_deref(), &mut errors);
        errors.into_result()
    }
}

/// Contract for partial profile updates
pub struct UpdateProfileContract;

impl Contract<ProfileChanges> for UpdateProfileContract {
    fn validate(&self, input: &ProfileChanges) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), PROFILE_RULES, Presence::IfPresent, &mut errors);
        if let Some(chambers) = &input.chambers {
            validate_chambers(chambers, &mut errors);
        }
        validate_email(input.email.as_deref(), &mut errors);
        errors.into_result()
    }
}

fn validate_chambers(chambers: &[ChamberInput], errors: &mut ValidationErrors) {
    let entries: Vec<Value> = chambers.iter().map(json_view).collect();
    validate_entries("chambers", &entries, CHAMBER_RULES, errors);

    for (index, chamber) in chambers.iter().enumerate() {
        if chamber.consultation_days.iter().any(|day| *day > 6) {
            errors.add(
                format!("chambers[{}].consultationDays", index),
                format!(
                    "Consultation Days must be between 0 (Sunday) and 6 (Saturday) for entry {}",
                    index + 1
                ),
            );
        }
    }
}

fn validate_email(email: Option<&str>, errors: &mut ValidationErrors) {
    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
        if !validator::validate_email(email) {
            errors.add("email", "Email is not a valid address");
        }
    }
}
