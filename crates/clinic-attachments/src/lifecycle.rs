//! Attachment lifecycle
//!
//! Resources reference attachments by remote id. New files are uploaded
//! before the owning record is written; replaced or orphaned files are
//! released afterwards. Release is best effort: a failed destroy is logged
//! and never fails the request that triggered it.

use std::sync::Arc;

use clinic_core::config::GatewayConfig;
use clinic_core::error::{ClinicError, ValidationErrors};
use clinic_core::result::ClinicResult;
use clinic_models::Attachment;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::gateway::{AttachmentGateway, DestroyOutcome, FileUpload};

/// Default upload size limit (10 MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Which files are accepted for upload
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    /// Accepted content type prefixes; empty accepts everything
    pub content_type_prefixes: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            content_type_prefixes: vec!["image/".to_string()],
        }
    }
}

impl UploadPolicy {
    /// Images only, up to the configured per-file size
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            ..Self::default()
        }
    }

    fn accepts_type(&self, content_type: &str) -> bool {
        self.content_type_prefixes.is_empty()
            || self
                .content_type_prefixes
                .iter()
                .any(|prefix| content_type.starts_with(prefix.as_str()))
    }
}

#[derive(Clone)]
pub struct AttachmentLifecycle {
    gateway: Arc<dyn AttachmentGateway>,
    policy: UploadPolicy,
}

impl AttachmentLifecycle {
    pub fn new(gateway: Arc<dyn AttachmentGateway>) -> Self {
        Self {
            gateway,
            policy: UploadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate files against the upload policy without uploading anything
    pub fn check(&self, field: &str, files: &[FileUpload]) -> ClinicResult<()> {
        let mut errors = ValidationErrors::new();
        for file in files {
            if file.bytes.is_empty() {
                errors.add(field, format!("{} is empty", file.file_name));
            } else if file.size() > self.policy.max_file_size {
                errors.add(
                    field,
                    format!(
                        "{} exceeds the maximum size of {} bytes",
                        file.file_name, self.policy.max_file_size
                    ),
                );
            } else if !self.policy.accepts_type(&file.content_type) {
                errors.add(
                    field,
                    format!("{} has unsupported type {}", file.file_name, file.content_type),
                );
            }
        }
        errors.into_result().map_err(ClinicError::from)
    }

    /// Upload one file and describe it as an attachment
    #[instrument(skip(self, file), fields(file = %file.file_name, gateway = self.gateway.name()))]
    pub async fn upload(&self, file: &FileUpload, folder: &str) -> ClinicResult<Attachment> {
        let asset = self.gateway.upload(file, folder).await?;
        debug!(remote_id = %asset.remote_id, stored_bytes = asset.bytes, "Upload complete");
        Ok(Attachment::new(asset.remote_id, asset.url)
            .with_display_name(file.file_name.clone())
            .with_size_bytes(file.size()))
    }

    /// Upload several files concurrently.
    ///
    /// Either every file is stored or none is: when any upload fails, the
    /// ones that succeeded are released before the error is returned.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_all(
        &self,
        files: &[FileUpload],
        folder: &str,
    ) -> ClinicResult<Vec<Attachment>> {
        let results = join_all(files.iter().map(|file| self.upload(file, folder))).await;

        let mut stored = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(attachment) => stored.push(attachment),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }

        match first_error {
            None => {
                info!(count = stored.len(), folder = %folder, "Attachments uploaded");
                Ok(stored)
            }
            Some(err) => {
                let released = self.release_all(&stored).await;
                warn!(
                    uploaded = stored.len(),
                    released = released,
                    error = %err,
                    "Batch upload failed; released partial uploads"
                );
                Err(err)
            }
        }
    }

    /// Best-effort delete of one attachment. Returns whether the host
    /// confirmed the object is gone.
    #[instrument(skip(self, attachment), fields(remote_id = %attachment.remote_id))]
    pub async fn release(&self, attachment: &Attachment) -> bool {
        match self.gateway.destroy(&attachment.remote_id).await {
            Ok(DestroyOutcome::Deleted) => {
                debug!("Attachment released");
                true
            }
            Ok(DestroyOutcome::NotFound) => {
                debug!("Attachment was already gone");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to release attachment");
                false
            }
        }
    }

    /// Release every attachment, one destroy call each. Returns how many
    /// were confirmed gone.
    pub async fn release_all(&self, attachments: &[Attachment]) -> usize {
        let outcomes = join_all(attachments.iter().map(|a| self.release(a))).await;
        outcomes.into_iter().filter(|released| *released).count()
    }

    /// Single-slot replacement: the previous attachment is released first,
    /// then the new file is uploaded.
    pub async fn replace(
        &self,
        previous: Option<&Attachment>,
        file: &FileUpload,
        folder: &str,
    ) -> ClinicResult<Attachment> {
        if let Some(previous) = previous {
            self.release(previous).await;
        }
        self.upload(file, folder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayResult, UploadedAsset};
    use crate::memory::{GatewayCall, MemoryGateway};
    use async_trait::async_trait;

    /// Host that stores a re-encoded copy half the size of the original
    struct ShrinkingGateway(MemoryGateway);

    #[async_trait]
    impl AttachmentGateway for ShrinkingGateway {
        async fn upload(&self, file: &FileUpload, folder: &str) -> GatewayResult<UploadedAsset> {
            let mut asset = self.0.upload(file, folder).await?;
            asset.bytes /= 2;
            Ok(asset)
        }

        async fn destroy(&self, remote_id: &str) -> GatewayResult<DestroyOutcome> {
            self.0.destroy(remote_id).await
        }

        fn name(&self) -> &str {
            "shrinking"
        }
    }

    fn png(name: &str, size: usize) -> FileUpload {
        FileUpload::new(name, vec![7u8; size])
    }

    #[tokio::test]
    async fn test_upload_describes_file() {
        let lifecycle = AttachmentLifecycle::new(Arc::new(MemoryGateway::new()));
        let attachment = lifecycle
            .upload(&png("front.png", 1024 * 1024), "clinic/albums")
            .await
            .unwrap();

        assert_eq!(attachment.display_name.as_deref(), Some("front.png"));
        assert_eq!(attachment.size_mb, Some(1.0));
        assert!(attachment.url.starts_with("memory://clinic/albums/"));
    }

    #[tokio::test]
    async fn test_size_is_taken_from_the_original_file() {
        let lifecycle = AttachmentLifecycle::new(Arc::new(ShrinkingGateway(MemoryGateway::new())));
        let attachment = lifecycle
            .upload(&png("scan.png", 2 * 1024 * 1024), "clinic/albums")
            .await
            .unwrap();

        assert_eq!(attachment.size_mb, Some(2.0));
    }

    #[tokio::test]
    async fn test_failed_upload_stores_nothing() {
        let gateway = Arc::new(MemoryGateway::failing_uploads());
        let lifecycle = AttachmentLifecycle::new(gateway.clone());

        let err = lifecycle.upload(&png("a.png", 4), "f").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(gateway.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_batch_is_released() {
        let gateway = Arc::new(MemoryGateway::new().fail_uploads_after(2));
        let lifecycle = AttachmentLifecycle::new(gateway.clone());
        let files = vec![png("a.png", 4), png("b.png", 4), png("c.png", 4)];

        assert!(lifecycle.upload_all(&files, "f").await.is_err());
        assert_eq!(gateway.stored_count(), 0);
        assert_eq!(gateway.destroy_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_release_all_calls_destroy_once_each() {
        let gateway = Arc::new(MemoryGateway::new());
        let lifecycle = AttachmentLifecycle::new(gateway.clone());
        let files = vec![png("a.png", 4), png("b.png", 4), png("c.png", 4)];
        let stored = lifecycle.upload_all(&files, "f").await.unwrap();

        assert_eq!(lifecycle.release_all(&stored).await, 3);
        assert_eq!(gateway.destroy_calls().len(), 3);
        assert_eq!(gateway.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_destroy_is_tolerated() {
        let gateway = Arc::new(MemoryGateway::new().failing_destroys());
        let lifecycle = AttachmentLifecycle::new(gateway.clone());

        let released = lifecycle
            .release(&Attachment::new("f/missing", "memory://f/missing"))
            .await;
        assert!(!released);
        assert_eq!(gateway.destroy_calls(), vec!["f/missing".to_string()]);
    }

    #[tokio::test]
    async fn test_replace_releases_previous() {
        let gateway = Arc::new(MemoryGateway::new());
        let lifecycle = AttachmentLifecycle::new(gateway.clone());
        let old = lifecycle.upload(&png("old.png", 4), "f").await.unwrap();

        let new = lifecycle
            .replace(Some(&old), &png("new.png", 4), "f")
            .await
            .unwrap();
        assert!(!gateway.contains(&old.remote_id));
        assert!(gateway.contains(&new.remote_id));
        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::Upload("old.png".to_string()),
                GatewayCall::Destroy(old.remote_id.clone()),
                GatewayCall::Upload("new.png".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_replace_proceeds_when_release_fails() {
        let gateway = Arc::new(MemoryGateway::new().failing_destroys());
        let lifecycle = AttachmentLifecycle::new(gateway.clone());
        let old = lifecycle.upload(&png("old.png", 4), "f").await.unwrap();

        let new = lifecycle
            .replace(Some(&old), &png("new.png", 4), "f")
            .await
            .unwrap();

        assert_ne!(new.remote_id, old.remote_id);
        assert_eq!(new.display_name.as_deref(), Some("new.png"));
        assert!(gateway.contains(&new.remote_id));
        assert_eq!(gateway.destroy_calls(), vec![old.remote_id.clone()]);
        assert_eq!(
            gateway.calls().last(),
            Some(&GatewayCall::Upload("new.png".to_string()))
        );
    }

    #[test]
    fn test_policy_follows_gateway_config() {
        let mut config = clinic_core::config::AppConfig::default().gateway;
        config.max_file_size_bytes = 8;
        let lifecycle = AttachmentLifecycle::new(Arc::new(MemoryGateway::new()))
            .with_policy(UploadPolicy::from_config(&config));

        assert!(lifecycle.check("images", &[png("a.png", 8)]).is_ok());
        assert!(lifecycle.check("images", &[png("b.png", 9)]).is_err());
    }

    #[test]
    fn test_check_rejects_non_images_and_empty_files() {
        let lifecycle = AttachmentLifecycle::new(Arc::new(MemoryGateway::new()));
        assert!(lifecycle.check("images", &[png("a.png", 3)]).is_ok());

        let err = lifecycle
            .check("images", &[FileUpload::new("notes.txt", vec![1u8]), png("b.png", 0)])
            .unwrap_err();
        match err {
            ClinicError::Validation(errors) => {
                assert_eq!(errors.get("images").map(|m| m.len()), Some(2));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
