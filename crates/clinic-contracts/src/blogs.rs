//! Blog post contracts

use clinic_core::error::ValidationErrors;
use clinic_models::{BlogChanges, NewBlogPost};

use crate::base::{json_view, validate_fields, Contract, FieldRule, Presence, ValidationResult};

pub const BLOG_RULES: &[FieldRule] = &[
    FieldRule::text("title", "Title"),
    FieldRule::text("category", "Category"),
    FieldRule::content("editorData", "Blog content"),
];

pub struct CreateBlogContract;

impl Contract<NewBlogPost> for CreateBlogContract {
    fn validate(&self, input: &NewBlogPost) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), BLOG_RULES, Presence::Required, &mut errors);
        errors.into_result()
    }
}

pub struct UpdateBlogContract;

impl Contract<BlogChanges> for UpdateBlogContract {
    fn validate(&self, input: &BlogChanges) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), BLOG_RULES, Presence::IfPresent, &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create() {
        let input = NewBlogPost {
            title: Some("Knee care".into()),
            category: Some("abc".into()),
            editor_data: Some(json!({"ops": [{"insert": "hello"}]})),
        };
        assert!(CreateBlogContract.validate(&input).is_ok());

        let input = NewBlogPost {
            editor_data: Some(json!({})),
            ..input
        };
        let errors = CreateBlogContract.validate(&input).unwrap_err();
        assert_eq!(errors.get("editorData").unwrap()[0], "Blog content is required");
    }

    #[test]
    fn test_update_ignores_absent() {
        let changes = BlogChanges {
            remove_cover_image: true,
            ..Default::default()
        };
        assert!(UpdateBlogContract.validate(&changes).is_ok());
    }
}
