//! Album contracts

use clinic_core::error::ValidationErrors;
use clinic_models::{AlbumChanges, NewAlbum};

use crate::base::{json_view, validate_fields, Contract, FieldRule, Presence, ValidationResult};

pub const ALBUM_RULES: &[FieldRule] = &[FieldRule::text("name", "Album name")];

/// Contract for creating an album; `image_count` is the number of files sent
pub struct CreateAlbumContract {
    pub image_count: usize,
}

impl Contract<NewAlbum> for CreateAlbumContract {
    fn validate(&self, input: &NewAlbum) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), ALBUM_RULES, Presence::Required, &mut errors);
        if self.image_count == 0 {
            errors.add("images", "At least one image is required");
        }
        errors.into_result()
    }
}

pub struct UpdateAlbumContract;

impl Contract<AlbumChanges> for UpdateAlbumContract {
    fn validate(&self, input: &AlbumChanges) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        validate_fields(&json_view(input), ALBUM_RULES, Presence::IfPresent, &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name_and_images() {
        let errors = CreateAlbumContract { image_count: 0 }
            .validate(&NewAlbum { name: Some(" ".into()) })
            .unwrap_err();
        assert_eq!(errors.get("name").unwrap()[0], "Album name is required");
        assert!(errors.has_error("images"));

        assert!(CreateAlbumContract { image_count: 2 }
            .validate(&NewAlbum { name: Some("Camp".into()) })
            .is_ok());
    }

    #[test]
    fn test_update_blank_name() {
        let changes = AlbumChanges {
            name: Some("".into()),
            ..Default::default()
        };
        assert!(UpdateAlbumContract.validate(&changes).is_err());
        assert!(UpdateAlbumContract.validate(&AlbumChanges::default()).is_ok());
    }
}
