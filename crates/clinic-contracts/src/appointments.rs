//! Appointment booking contract

use chrono::{DateTime, NaiveDate};
use clinic_core::error::ValidationErrors;
use clinic_models::NewAppointment;
use uuid::Uuid;

use crate::base::{json_view, present, validate_fields, Contract, FieldRule, Presence, ValidationResult};

pub const APPOINTMENT_RULES: &[FieldRule] = &[
    FieldRule::text("doctorInfo", "Doctor"),
    FieldRule::text("appointmentDate", "Appointment date"),
    FieldRule::text("name", "Name"),
    FieldRule::text("phone", "Phone"),
    FieldRule::text("email", "Email"),
];

/// Contract for public appointment booking
pub struct BookAppointmentContract;

impl Contract<NewAppointment> for BookAppointmentContract {
    fn validate(&self, input: &NewAppointment) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), APPOINTMENT_RULES, Presence::Required, &mut errors);

        if let Some(date) = present(input.appointment_date.as_deref()) {
            if parse_appointment_date(date).is_none() {
                errors.add("appointmentDate", "Appointment date is not a valid date");
            }
        }
        if let Some(email) = present(input.email.as_deref()) {
            if !validator::validate_email(email) {
                errors.add("email", "Email is not a valid address");
            }
        }

        errors.into_result()
    }
}

/// Parse a booking date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_appointment_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Parse a document id; malformed ids are treated as unknown by callers
pub fn parse_document_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}
