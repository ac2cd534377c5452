//! Cloudinary-compatible HTTP gateway
//!
//! Uses the signed upload API: every request carries the API key, a UNIX
//! timestamp and a signature, the SHA-1 hex digest of the sorted request
//! parameters followed by the API secret.

use async_trait::async_trait;
use clinic_core::config::GatewayConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, info, instrument};
use url::Url;

use crate::gateway::{
    AttachmentGateway, DestroyOutcome, FileUpload, GatewayError, GatewayResult, UploadedAsset,
};

pub struct CloudinaryGateway {
    client: reqwest::Client,
    base_url: Url,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryGateway {
    pub fn new(
        base_url: &str,
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Config(format!("invalid base url '{}': {}", base_url, e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        })
    }

    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        match (&config.cloud_name, &config.api_key, &config.api_secret) {
            (Some(cloud), Some(key), Some(secret)) => {
                Self::new(&config.base_url, cloud.clone(), key.clone(), secret.clone())
            }
            _ => Err(GatewayError::Config(
                "CLOUD_NAME, API_KEY and API_SECRET must all be set".into(),
            )),
        }
    }

    fn endpoint(&self, action: &str) -> GatewayResult<Url> {
        let path = format!(
            "{}/{}/image/{}",
            self.base_url.path().trim_end_matches('/'),
            self.cloud_name,
            action
        );
        let mut url = self.base_url.clone();
        url.set_path(&path);
        Ok(url)
    }

    /// Signature over the given parameters (excluding file and api_key)
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    async fn error_from(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => GatewayError::Rejected(format!("{}: {}", status, body.error.message)),
            Err(_) => GatewayError::Rejected(status.to_string()),
        }
    }
}

#[async_trait]
impl AttachmentGateway for CloudinaryGateway {
    #[instrument(skip(self, file), fields(gateway = "cloudinary", file = %file.file_name))]
    async fn upload(&self, file: &FileUpload, folder: &str) -> GatewayResult<UploadedAsset> {
        let timestamp = Self::timestamp();
        let signature = self.sign(&[
            ("folder", folder.to_string()),
            ("timestamp", timestamp.clone()),
        ]);

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload")?)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        info!(remote_id = %body.public_id, "Attachment uploaded");
        Ok(UploadedAsset {
            remote_id: body.public_id,
            url: body.secure_url,
            bytes: if body.bytes > 0 { body.bytes } else { file.size() },
        })
    }

    #[instrument(skip(self), fields(gateway = "cloudinary"))]
    async fn destroy(&self, remote_id: &str) -> GatewayResult<DestroyOutcome> {
        let timestamp = Self::timestamp();
        let signature = self.sign(&[
            ("public_id", remote_id.to_string()),
            ("timestamp", timestamp.clone()),
        ]);

        let form = Form::new()
            .text("public_id", remote_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);
        let response = self
            .client
            .post(self.endpoint("destroy")?)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        debug!(remote_id = %remote_id, result = %body.result, "Destroy answered");
        match body.result.as_str() {
            "ok" => Ok(DestroyOutcome::Deleted),
            "not found" => Ok(DestroyOutcome::NotFound),
            other => Err(GatewayError::InvalidResponse(format!(
                "unexpected destroy result '{}'",
                other
            ))),
        }
    }

    fn name(&self) -> &str {
        "cloudinary"
    }
}
