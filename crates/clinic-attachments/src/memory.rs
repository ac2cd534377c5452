//! In-memory attachment gateway
//!
//! Keeps uploaded bytes in process memory. Used when no image host is
//! configured and in tests, where failures can be injected.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::gateway::{AttachmentGateway, DestroyOutcome, FileUpload, GatewayError, GatewayResult, UploadedAsset};

/// A call made against the gateway, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Upload(String),
    Destroy(String),
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Bytes>,
    uploads: usize,
    calls: Vec<GatewayCall>,
}

#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
    /// Uploads beyond this many successful ones fail
    upload_limit: Option<usize>,
    fail_destroys: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload fails
    pub fn failing_uploads() -> Self {
        Self::default().fail_uploads_after(0)
    }

    /// Allow `n` uploads to succeed, then fail the rest
    pub fn fail_uploads_after(mut self, n: usize) -> Self {
        self.upload_limit = Some(n);
        self
    }

    /// Every destroy call fails
    pub fn failing_destroys(mut self) -> Self {
        self.fail_destroys = true;
        self
    }

    pub fn contains(&self, remote_id: &str) -> bool {
        self.state.lock().objects.contains_key(remote_id)
    }

    pub fn stored_count(&self) -> usize {
        self.state.lock().objects.len()
    }

    /// Remote ids passed to `destroy`, in call order
    pub fn destroy_calls(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Destroy(remote_id) => Some(remote_id.clone()),
                GatewayCall::Upload(_) => None,
            })
            .collect()
    }

    /// Every upload and destroy, failed ones included. Uploads are
    /// recorded by file name.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl AttachmentGateway for MemoryGateway {
    async fn upload(&self, file: &FileUpload, folder: &str) -> GatewayResult<UploadedAsset> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::Upload(file.file_name.clone()));
        if let Some(limit) = self.upload_limit {
            if state.uploads >= limit {
                return Err(GatewayError::Rejected(format!(
                    "upload of {} refused",
                    file.file_name
                )));
            }
        }

        let remote_id = format!("{}/{}", folder.trim_end_matches('/'), Uuid::new_v4().simple());
        let url = format!("memory://{}", remote_id);
        state.objects.insert(remote_id.clone(), file.bytes.clone());
        state.uploads += 1;

        debug!(remote_id = %remote_id, size = file.size(), "Stored attachment in memory");
        Ok(UploadedAsset {
            remote_id,
            url,
            bytes: file.size(),
        })
    }

    async fn destroy(&self, remote_id: &str) -> GatewayResult<DestroyOutcome> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::Destroy(remote_id.to_string()));
        if self.fail_destroys {
            return Err(GatewayError::Transport("host unreachable".into()));
        }
        Ok(match state.objects.remove(remote_id) {
            Some(_) => DestroyOutcome::Deleted,
            None => DestroyOutcome::NotFound,
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_destroy() {
        let gateway = MemoryGateway::new();
        let asset = gateway
            .upload(&FileUpload::new("a.png", vec![0u8; 10]), "clinic/albums")
            .await
            .unwrap();

        assert!(asset.remote_id.starts_with("clinic/albums/"));
        assert_eq!(asset.bytes, 10);
        assert!(gateway.contains(&asset.remote_id));

        assert_eq!(gateway.destroy(&asset.remote_id).await.unwrap(), DestroyOutcome::Deleted);
        assert_eq!(gateway.destroy(&asset.remote_id).await.unwrap(), DestroyOutcome::NotFound);
        assert_eq!(gateway.destroy_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_limit() {
        let gateway = MemoryGateway::new().fail_uploads_after(1);
        let file = FileUpload::new("a.png", vec![1u8]);

        assert!(gateway.upload(&file, "f").await.is_ok());
        assert!(gateway.upload(&file, "f").await.is_err());
        assert_eq!(gateway.stored_count(), 1);
        assert_eq!(gateway.calls().len(), 2);
    }
}
