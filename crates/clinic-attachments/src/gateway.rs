//! Attachment gateway abstraction
//!
//! Provides a unified interface over the external image host.

use async_trait::async_trait;
use bytes::Bytes;
use clinic_core::error::ClinicError;
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Upload rejected by host: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected host response: {0}")]
    InvalidResponse(String),
    #[error("Gateway misconfigured: {0}")]
    Config(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<GatewayError> for ClinicError {
    fn from(err: GatewayError) -> Self {
        ClinicError::upstream("attachment gateway", err.to_string())
    }
}

/// A file received from a client, ready to upload
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    /// Content type is guessed from the file name
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Use the content type declared by the client when there is one
    pub fn with_content_type(mut self, content_type: Option<&str>) -> Self {
        if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
            self.content_type = ct.to_string();
        }
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// What the host returned for a stored file
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAsset {
    pub remote_id: String,
    pub url: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Deleted,
    /// The host had no object with that id
    NotFound,
}

/// External object store for binary attachments
#[async_trait]
pub trait AttachmentGateway: Send + Sync {
    /// Store a file under a folder, returning its identifier and URL
    async fn upload(&self, file: &FileUpload, folder: &str) -> GatewayResult<UploadedAsset>;

    /// Delete a stored file by identifier
    async fn destroy(&self, remote_id: &str) -> GatewayResult<DestroyOutcome>;

    /// Gateway name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_guess() {
        let file = FileUpload::new("portrait.JPG", vec![1u8, 2, 3]);
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.size(), 3);

        let file = FileUpload::new("blob", Vec::<u8>::new()).with_content_type(Some("image/png"));
        assert_eq!(file.content_type, "image/png");
    }

    #[test]
    fn test_gateway_error_is_upstream() {
        let err: ClinicError = GatewayError::Transport("timeout".into()).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "upstream_error");
    }
}
