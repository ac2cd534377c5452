//! Blog post service
//!
//! Posts belong to a treatment category and are authored by the doctor whose
//! profile carries the signed-in user's email.

use std::sync::Arc;

use clinic_attachments::{AttachmentLifecycle, FileUpload};
use clinic_auth::CurrentUser;
use clinic_contracts::appointments::parse_document_id;
use clinic_contracts::blogs::{CreateBlogContract, UpdateBlogContract};
use clinic_core::error::ClinicError;
use clinic_core::result::ClinicResult;
use clinic_core::traits::{Document, DocumentId};
use clinic_db::DocumentStore;
use clinic_models::{BlogChanges, BlogPost, NewBlogPost, Profile, Treatment};
use serde_json::Value;
use tracing::{info, instrument};

use crate::base::{
    apply_order, available_slug, find_or_404, find_slug_or_404, parse_id, present, validate,
};

const COVER_FIELD: &str = "coverPhoto";

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn DocumentStore<BlogPost>>,
    treatments: Arc<dyn DocumentStore<Treatment>>,
    profiles: Arc<dyn DocumentStore<Profile>>,
    attachments: AttachmentLifecycle,
    folder: String,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn DocumentStore<BlogPost>>,
        treatments: Arc<dyn DocumentStore<Treatment>>,
        profiles: Arc<dyn DocumentStore<Profile>>,
        attachments: AttachmentLifecycle,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            posts,
            treatments,
            profiles,
            attachments,
            folder: folder.into(),
        }
    }

    async fn category(&self, raw: &str) -> ClinicResult<DocumentId> {
        let invalid = || ClinicError::missing_reference("Invalid category");
        let id = parse_document_id(raw).ok_or_else(invalid)?;
        if self.treatments.exists(id).await? {
            Ok(id)
        } else {
            Err(invalid())
        }
    }

    async fn author(&self, user: &CurrentUser) -> ClinicResult<Profile> {
        self.profiles
            .find_where("email", user.email.trim())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClinicError::missing_reference("Author profile not found"))
    }

    #[instrument(skip_all, fields(user = %user.id, title = ?input.title))]
    pub async fn create(
        &self,
        user: &CurrentUser,
        input: NewBlogPost,
        cover: Option<FileUpload>,
    ) -> ClinicResult<BlogPost> {
        validate(&CreateBlogContract, &input)?;
        if let Some(file) = &cover {
            self.attachments.check(COVER_FIELD, std::slice::from_ref(file))?;
        }

        let category = self
            .category(input.category.as_deref().unwrap_or_default())
            .await?;
        let author = self.author(user).await?;
        let title = present(input.title).unwrap_or_default();
        let slug = available_slug(self.posts.as_ref(), &title, None).await?;

        let mut post = BlogPost::new(
            title,
            slug,
            category,
            input.editor_data.unwrap_or(Value::Null),
            author.name.clone(),
            author.photo_url().map(str::to_string),
        );
        if let Some(file) = &cover {
            post.cover_photo = vec![self.attachments.upload(file, &self.folder).await?];
        }

        if let Err(e) = self.posts.insert(&post).await {
            self.attachments.release_all(&post.cover_photo).await;
            return Err(e.into());
        }

        info!(post_id = %post.id, slug = %post.slug, "Blog post created");
        Ok(post)
    }

    pub async fn list(&self) -> ClinicResult<Vec<BlogPost>> {
        Ok(self.posts.find_all().await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> ClinicResult<BlogPost> {
        find_slug_or_404(self.posts.as_ref(), slug).await
    }

    /// Edit a post addressed by slug.
    ///
    /// `removeCoverImage` drops the current cover; a new cover replaces it
    /// (old one released first).
    #[instrument(skip(self, changes, cover))]
    pub async fn update(
        &self,
        slug: &str,
        changes: BlogChanges,
        cover: Option<FileUpload>,
    ) -> ClinicResult<BlogPost> {
        let mut post = self.get_by_slug(slug).await?;
        validate(&UpdateBlogContract, &changes)?;
        if let Some(file) = &cover {
            self.attachments.check(COVER_FIELD, std::slice::from_ref(file))?;
        }

        if let Some(raw) = present(changes.category) {
            post.category = self.category(&raw).await?;
        }
        if let Some(title) = present(changes.title) {
            if title != post.title {
                post.slug = available_slug(self.posts.as_ref(), &title, Some(post.id)).await?;
                post.title = title;
            }
        }
        if let Some(editor_data) = changes.editor_data {
            post.editor_data = editor_data;
        }

        if changes.remove_cover_image || cover.is_some() {
            let previous = std::mem::take(&mut post.cover_photo);
            self.attachments.release_all(&previous).await;
        }
        if let Some(file) = &cover {
            post.cover_photo = vec![self.attachments.upload(file, &self.folder).await?];
        }

        post.touch();
        self.posts.update(&post).await?;
        info!(post_id = %post.id, slug = %post.slug, "Blog post updated");
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ClinicResult<BlogPost> {
        let post = find_or_404(self.posts.as_ref(), parse_id::<BlogPost>(id)?).await?;
        self.attachments.release_all(&post.cover_photo).await;
        self.posts.delete(post.id).await?;
        info!(post_id = %post.id, "Blog post deleted");
        Ok(post)
    }

    pub async fn reorder(&self, order: &[String]) -> ClinicResult<()> {
        apply_order(self.posts.as_ref(), order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{photo, profile_input, Harness};
    use clinic_models::NewTreatment;
    use serde_json::json;
    use uuid::Uuid;

    async fn setup(h: &Harness) -> (CurrentUser, Treatment) {
        h.services
            .profiles
            .create(profile_input("writer@example.com"), Some(photo("me.jpg")))
            .await
            .unwrap();
        let treatment = h
            .services
            .treatments
            .create(NewTreatment {
                title: Some("Scoliosis".into()),
                sub_title: Some("Spinal curvature".into()),
            })
            .await
            .unwrap();
        (CurrentUser::doctor("u1", "writer@example.com"), treatment)
    }

    fn post(title: &str, category: DocumentId) -> NewBlogPost {
        NewBlogPost {
            title: Some(title.into()),
            category: Some(category.to_string()),
            editor_data: Some(json!({"blocks": [{"type": "paragraph"}]})),
        }
    }

    #[tokio::test]
    async fn test_create_resolves_author_and_strips_slug() {
        let h = Harness::new();
        let (user, treatment) = setup(&h).await;

        let created = h
            .services
            .blogs
            .create(&user, post("Back pain: what & why?", treatment.id), Some(photo("c.jpg")))
            .await
            .unwrap();

        assert_eq!(created.slug, "back-pain-what-why");
        assert_eq!(created.author_name, "Dr. Example");
        assert!(created.author_image.is_some());
        assert_eq!(created.cover_photo.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let h = Harness::new();
        let (user, _) = setup(&h).await;

        let err = h
            .services
            .blogs
            .create(&user, post("Post", Uuid::new_v4()), Some(photo("c.jpg")))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.public_message(), "Invalid category");
        assert_eq!(h.stores.blog_posts.count().await.unwrap(), 0);
        // only the author's profile photo was uploaded
        assert_eq!(h.gateway.stored_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_author_profile() {
        let h = Harness::new();
        let (_, treatment) = setup(&h).await;
        let stranger = CurrentUser::admin("u9", "someone@example.com");

        let err = h
            .services
            .blogs
            .create(&stranger, post("Post", treatment.id), None)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Author profile not found");
    }

    #[tokio::test]
    async fn test_update_reslugs_and_removes_cover() {
        let h = Harness::new();
        let (user, treatment) = setup(&h).await;
        let created = h
            .services
            .blogs
            .create(&user, post("First title", treatment.id), Some(photo("c.jpg")))
            .await
            .unwrap();
        let cover = created.cover_photo[0].remote_id.clone();

        let changes = BlogChanges {
            title: Some("Second title".into()),
            remove_cover_image: true,
            ..Default::default()
        };
        let updated = h
            .services
            .blogs
            .update("first-title", changes, None)
            .await
            .unwrap();

        assert_eq!(updated.slug, "second-title");
        assert!(updated.cover_photo.is_empty());
        assert!(!h.gateway.contains(&cover));
        assert!(h.services.blogs.get_by_slug("first-title").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let h = Harness::new();
        let (user, treatment) = setup(&h).await;
        let created = h
            .services
            .blogs
            .create(&user, post("Post", treatment.id), Some(photo("c.jpg")))
            .await
            .unwrap();

        h.services.blogs.delete(&created.id.to_string()).await.unwrap();
        assert_eq!(h.stores.blog_posts.count().await.unwrap(), 0);
        assert!(!h.gateway.contains(&created.cover_photo[0].remote_id));
    }
}
