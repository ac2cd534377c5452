//! Treatment (guidance) categories

use std::sync::Arc;

use clinic_contracts::treatments::{CreateTreatmentContract, UpdateTreatmentContract};
use clinic_core::error::{ClinicError, ValidationErrors};
use clinic_core::result::ClinicResult;
use clinic_core::traits::Document;
use clinic_db::DocumentStore;
use clinic_models::{BlogPost, NewTreatment, Treatment, TreatmentChanges};
use tracing::{info, instrument};

use crate::base::{find_or_404, parse_id, present, validate};

#[derive(Clone)]
pub struct TreatmentService {
    treatments: Arc<dyn DocumentStore<Treatment>>,
    posts: Arc<dyn DocumentStore<BlogPost>>,
}

impl TreatmentService {
    pub fn new(
        treatments: Arc<dyn DocumentStore<Treatment>>,
        posts: Arc<dyn DocumentStore<BlogPost>>,
    ) -> Self {
        Self { treatments, posts }
    }

    #[instrument(skip_all, fields(title = ?input.title))]
    pub async fn create(&self, input: NewTreatment) -> ClinicResult<Treatment> {
        validate(&CreateTreatmentContract, &input)?;

        let treatment = Treatment::new(
            present(input.title).unwrap_or_default(),
            present(input.sub_title).unwrap_or_default(),
        );
        self.treatments.insert(&treatment).await?;

        info!(treatment_id = %treatment.id, "Treatment created");
        Ok(treatment)
    }

    pub async fn list(&self) -> ClinicResult<Vec<Treatment>> {
        Ok(self.treatments.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> ClinicResult<Treatment> {
        find_or_404(self.treatments.as_ref(), parse_id::<Treatment>(id)?).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: TreatmentChanges) -> ClinicResult<Treatment> {
        let mut treatment = self.get(id).await?;
        validate(&UpdateTreatmentContract, &changes)?;

        if let Some(title) = present(changes.title) {
            treatment.title = title;
        }
        if let Some(sub_title) = present(changes.sub_title) {
            treatment.sub_title = sub_title;
        }
        treatment.touch();
        self.treatments.update(&treatment).await?;
        Ok(treatment)
    }

    /// Refused while blog posts are filed under the treatment
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ClinicResult<Treatment> {
        let treatment = self.get(id).await?;

        let used_by = self
            .posts
            .find_where("category", &treatment.id.to_string())
            .await?
            .len();
        if used_by > 0 {
            let mut errors = ValidationErrors::new();
            errors.add_base(format!("Treatment is used by {} blog post(s)", used_by));
            return Err(ClinicError::Validation(errors));
        }

        self.treatments.delete(treatment.id).await?;
        info!(treatment_id = %treatment.id, "Treatment deleted");
        Ok(treatment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{profile_input, Harness};
    use clinic_auth::CurrentUser;
    use clinic_models::NewBlogPost;
    use serde_json::json;

    fn input(title: &str, sub_title: &str) -> NewTreatment {
        NewTreatment {
            title: Some(title.into()),
            sub_title: Some(sub_title.into()),
        }
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let h = Harness::new();
        let created = h
            .services
            .treatments
            .create(input("Scoliosis", "Spinal curvature"))
            .await
            .unwrap();

        let read = h
            .services
            .treatments
            .get(&created.id.to_string())
            .await
            .unwrap();
        assert_eq!(read.title, "Scoliosis");
        assert_eq!(read.sub_title, "Spinal curvature");
    }

    #[tokio::test]
    async fn test_blank_title_named() {
        let h = Harness::new();
        let err = h
            .services
            .treatments
            .create(input("", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Title is required");
    }

    #[tokio::test]
    async fn test_update_requires_both_fields() {
        let h = Harness::new();
        let created = h
            .services
            .treatments
            .create(input("Scoliosis", "Spinal curvature"))
            .await
            .unwrap();

        let changes = TreatmentChanges {
            title: Some("Kyphosis".into()),
            sub_title: None,
        };
        let err = h
            .services
            .treatments
            .update(&created.id.to_string(), changes)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Sub Title is required");
    }

    #[tokio::test]
    async fn test_delete_refused_while_referenced() {
        let h = Harness::new();
        let treatment = h
            .services
            .treatments
            .create(input("Scoliosis", "Spinal curvature"))
            .await
            .unwrap();
        h.services
            .profiles
            .create(profile_input("writer@example.com"), None)
            .await
            .unwrap();
        let user = CurrentUser::doctor("u1", "writer@example.com");
        let post = h
            .services
            .blogs
            .create(
                &user,
                NewBlogPost {
                    title: Some("Exercises".into()),
                    category: Some(treatment.id.to_string()),
                    editor_data: Some(json!({"blocks": []})),
                },
                None,
            )
            .await
            .unwrap();

        let err = h
            .services
            .treatments
            .delete(&treatment.id.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "Treatment is used by 1 blog post(s)");

        h.services.blogs.delete(&post.id.to_string()).await.unwrap();
        assert!(h
            .services
            .treatments
            .delete(&treatment.id.to_string())
            .await
            .is_ok());
    }
}
