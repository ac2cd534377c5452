//! Video and exercise-video listings
//!
//! Both are addressed by slug. Plain videos must be YouTube links; exercise
//! videos may also point at Google Drive and carry an optional thumbnail.

use std::sync::Arc;

use clinic_attachments::{AttachmentLifecycle, FileUpload};
use clinic_contracts::videos::{
    CreateVideoContract, UpdateVideoContract, VideoPolicy, EXERCISE_VIDEO_POLICY, VIDEO_POLICY,
};
use clinic_core::error::ClinicError;
use clinic_core::result::ClinicResult;
use clinic_core::traits::Document;
use clinic_db::DocumentStore;
use clinic_models::{ExerciseVideo, NewVideo, Video, VideoChanges, VideoKind};
use tracing::{info, instrument};

use crate::base::{apply_order, available_slug, find_slug_or_404, present, validate};

const THUMBNAIL_FIELD: &str = "thumbnail";

fn classify(policy: &VideoPolicy, url: &str) -> ClinicResult<VideoKind> {
    policy
        .accept(url)
        .ok_or_else(|| ClinicError::invalid("url", policy.rejection))
}

#[derive(Clone)]
pub struct VideoService {
    videos: Arc<dyn DocumentStore<Video>>,
}

impl VideoService {
    pub fn new(videos: Arc<dyn DocumentStore<Video>>) -> Self {
        Self { videos }
    }

    #[instrument(skip_all, fields(title = ?input.title))]
    pub async fn create(&self, input: NewVideo) -> ClinicResult<Video> {
        validate(&CreateVideoContract { policy: VIDEO_POLICY }, &input)?;

        let title = present(input.title).unwrap_or_default();
        let url = present(input.url).unwrap_or_default();
        let slug = available_slug(self.videos.as_ref(), &title, None).await?;

        let video = Video::new(title, url, slug);
        self.videos.insert(&video).await?;
        info!(video_id = %video.id, slug = %video.slug, "Video created");
        Ok(video)
    }

    pub async fn list(&self) -> ClinicResult<Vec<Video>> {
        Ok(self.videos.find_all().await?)
    }

    pub async fn get(&self, slug: &str) -> ClinicResult<Video> {
        find_slug_or_404(self.videos.as_ref(), slug).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update(&self, slug: &str, changes: VideoChanges) -> ClinicResult<Video> {
        let mut video = self.get(slug).await?;
        validate(&UpdateVideoContract { policy: VIDEO_POLICY }, &changes)?;

        if let Some(title) = present(changes.title) {
            if title != video.title {
                video.slug = available_slug(self.videos.as_ref(), &title, Some(video.id)).await?;
                video.title = title;
            }
        }
        if let Some(url) = present(changes.url) {
            video.url = url;
        }
        video.touch();
        self.videos.update(&video).await?;
        Ok(video)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, slug: &str) -> ClinicResult<Video> {
        let video = self.get(slug).await?;
        self.videos.delete(video.id).await?;
        info!(video_id = %video.id, "Video deleted");
        Ok(video)
    }

    pub async fn reorder(&self, order: &[String]) -> ClinicResult<()> {
        apply_order(self.videos.as_ref(), order).await
    }
}

#[derive(Clone)]
pub struct ExerciseVideoService {
    videos: Arc<dyn DocumentStore<ExerciseVideo>>,
    attachments: AttachmentLifecycle,
    folder: String,
}

impl ExerciseVideoService {
    pub fn new(
        videos: Arc<dyn DocumentStore<ExerciseVideo>>,
        attachments: AttachmentLifecycle,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            videos,
            attachments,
            folder: folder.into(),
        }
    }

    #[instrument(skip_all, fields(title = ?input.title))]
    pub async fn create(
        &self,
        input: NewVideo,
        thumbnail: Option<FileUpload>,
    ) -> ClinicResult<ExerciseVideo> {
        validate(
            &CreateVideoContract {
                policy: EXERCISE_VIDEO_POLICY,
            },
            &input,
        )?;
        if let Some(file) = &thumbnail {
            self.attachments
                .check(THUMBNAIL_FIELD, std::slice::from_ref(file))?;
        }

        let title = present(input.title).unwrap_or_default();
        let url = present(input.url).unwrap_or_default();
        let kind = classify(&EXERCISE_VIDEO_POLICY, &url)?;
        let slug = available_slug(self.videos.as_ref(), &title, None).await?;

        let mut video = ExerciseVideo::new(title, url, kind, slug);
        if let Some(file) = &thumbnail {
            video.thumbnail = vec![self.attachments.upload(file, &self.folder).await?];
        }

        if let Err(e) = self.videos.insert(&video).await {
            self.attachments.release_all(&video.thumbnail).await;
            return Err(e.into());
        }

        info!(video_id = %video.id, slug = %video.slug, kind = %video.video_type, "Exercise video created");
        Ok(video)
    }

    pub async fn list(&self) -> ClinicResult<Vec<ExerciseVideo>> {
        Ok(self.videos.find_all().await?)
    }

    pub async fn get(&self, slug: &str) -> ClinicResult<ExerciseVideo> {
        find_slug_or_404(self.videos.as_ref(), slug).await
    }

    /// Update fields; a new thumbnail replaces the current one (old released first)
    #[instrument(skip(self, changes, thumbnail))]
    pub async fn update(
        &self,
        slug: &str,
        changes: VideoChanges,
        thumbnail: Option<FileUpload>,
    ) -> ClinicResult<ExerciseVideo> {
        let mut video = self.get(slug).await?;
        validate(
            &UpdateVideoContract {
                policy: EXERCISE_VIDEO_POLICY,
            },
            &changes,
        )?;
        if let Some(file) = &thumbnail {
            self.attachments
                .check(THUMBNAIL_FIELD, std::slice::from_ref(file))?;
        }

        if let Some(title) = present(changes.title) {
            if title != video.title {
                video.slug = available_slug(self.videos.as_ref(), &title, Some(video.id)).await?;
                video.title = title;
            }
        }
        if let Some(url) = present(changes.url) {
            video.video_type = classify(&EXERCISE_VIDEO_POLICY, &url)?;
            video.url = url;
        }

        if let Some(file) = &thumbnail {
            let previous = std::mem::take(&mut video.thumbnail);
            for old in previous.iter().skip(1) {
                self.attachments.release(old).await;
            }
            let replacement = self
                .attachments
                .replace(previous.first(), file, &self.folder)
                .await?;
            video.thumbnail = vec![replacement];
        }

        video.touch();
        self.videos.update(&video).await?;
        Ok(video)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, slug: &str) -> ClinicResult<ExerciseVideo> {
        let video = self.get(slug).await?;
        self.attachments.release_all(&video.thumbnail).await;
        self.videos.delete(video.id).await?;
        info!(video_id = %video.id, "Exercise video deleted");
        Ok(video)
    }

    pub async fn reorder(&self, order: &[String]) -> ClinicResult<()> {
        apply_order(self.videos.as_ref(), order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{photo, Harness};

    fn input(title: &str, url: &str) -> NewVideo {
        NewVideo {
            title: Some(title.into()),
            url: Some(url.into()),
        }
    }

    #[tokio::test]
    async fn test_video_requires_youtube() {
        let h = Harness::new();
        let err = h
            .services
            .videos
            .create(input("Stretching", "https://drive.google.com/file/d/1"))
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Please provide a valid YouTube link");

        let video = h
            .services
            .videos
            .create(input("Stretching", "https://youtu.be/abc"))
            .await
            .unwrap();
        assert_eq!(video.slug, "stretching");
    }

    #[tokio::test]
    async fn test_video_update_renames_slug() {
        let h = Harness::new();
        h.services
            .videos
            .create(input("Stretching", "https://youtu.be/abc"))
            .await
            .unwrap();

        let updated = h
            .services
            .videos
            .update(
                "stretching",
                VideoChanges {
                    title: Some("Morning Stretching".into()),
                    url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "morning-stretching");
        assert_eq!(h.services.videos.get("stretching").await.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_exercise_video_kinds() {
        let h = Harness::new();
        let drive = h
            .services
            .exercise_videos
            .create(input("Neck drill", "https://drive.google.com/file/d/1"), None)
            .await
            .unwrap();
        assert_eq!(drive.video_type, VideoKind::GoogleDrive);

        let err = h
            .services
            .exercise_videos
            .create(input("Other", "https://vimeo.com/1"), None)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Invalid video URL");
    }

    #[tokio::test]
    async fn test_exercise_thumbnail_replaced_and_released() {
        let h = Harness::new();
        let created = h
            .services
            .exercise_videos
            .create(
                input("Neck drill", "https://youtube.com/watch?v=1"),
                Some(photo("t1.png")),
            )
            .await
            .unwrap();
        let old = created.thumbnail[0].remote_id.clone();

        let updated = h
            .services
            .exercise_videos
            .update("neck-drill", VideoChanges::default(), Some(photo("t2.png")))
            .await
            .unwrap();
        assert!(!h.gateway.contains(&old));
        assert!(h.gateway.contains(&updated.thumbnail[0].remote_id));

        h.services.exercise_videos.delete("neck-drill").await.unwrap();
        assert_eq!(h.gateway.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_reorder_rejects_duplicates() {
        let h = Harness::new();
        let video = h
            .services
            .videos
            .create(input("One", "https://youtu.be/1"))
            .await
            .unwrap();
        let id = video.id.to_string();

        let err = h.services.videos.reorder(&[id.clone(), id]).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
