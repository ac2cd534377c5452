//! Treatment contracts

use clinic_core::error::ValidationErrors;
use clinic_models::{NewTreatment, TreatmentChanges};

use crate::base::{json_view, validate_fields, Contract, FieldRule, Presence, ValidationResult};

pub const TREATMENT_RULES: &[FieldRule] = &[
    FieldRule::text("title", "Title"),
    FieldRule::text("subTitle", "Sub Title"),
];

pub struct CreateTreatmentContract;

impl Contract<NewTreatment> for CreateTreatmentContract {
    fn validate(&self, input: &NewTreatment) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), TREATMENT_RULES, Presence::Required, &mut errors);
        errors.into_result()
    }
}

/// Both fields are re-validated on update
pub struct UpdateTreatmentContract;

impl Contract<TreatmentChanges> for UpdateTreatmentContract {
    fn validate(&self, input: &TreatmentChanges) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), TREATMENT_RULES, Presence::Required, &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_title_required() {
        let input = NewTreatment {
            title: Some("".into()),
            sub_title: Some("x".into()),
        };
        let errors = CreateTreatmentContract.validate(&input).unwrap_err();
        assert_eq!(errors.full_messages(), vec!["Title is required".to_string()]);
    }

    #[test]
    fn test_update_requires_both() {
        let changes = TreatmentChanges {
            title: Some("Scoliosis".into()),
            sub_title: None,
        };
        let errors = UpdateTreatmentContract.validate(&changes).unwrap_err();
        assert_eq!(errors.get("subTitle").unwrap()[0], "Sub Title is required");
    }
}
