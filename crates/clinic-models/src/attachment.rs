//! Attachment model
//!
//! An attachment is a binary object held by the external image host. The
//! owning resource keeps only the remote identifier and the retrieval URL.

use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Externally hosted binary owned by exactly one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Identifier assigned by the image host
    #[serde(alias = "public_id")]
    pub remote_id: String,

    /// Retrieval URL
    #[serde(alias = "src")]
    pub url: String,

    /// Original file name
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "name")]
    pub display_name: Option<String>,

    /// Size in megabytes, two decimals
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "size")]
    pub size_mb: Option<f64>,
}

impl Attachment {
    pub fn new(remote_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            url: url.into(),
            display_name: None,
            size_mb: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_size_bytes(mut self, bytes: u64) -> Self {
        self.size_mb = Some(size_in_mb(bytes));
        self
    }
}

/// Byte count to megabytes rounded to two decimals
pub fn size_in_mb(bytes: u64) -> f64 {
    ((bytes as f64 / BYTES_PER_MB) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_mb() {
        assert_eq!(size_in_mb(0), 0.0);
        assert_eq!(size_in_mb(1024 * 1024), 1.0);
        assert_eq!(size_in_mb(1_500_000), 1.43);
    }

    #[test]
    fn test_accepts_legacy_field_names() {
        let json = r#"{"public_id":"poc/abc","src":"https://img/abc.jpg","name":"a.jpg","size":0.5}"#;
        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.remote_id, "poc/abc");
        assert_eq!(attachment.url, "https://img/abc.jpg");
        assert_eq!(attachment.display_name.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let attachment = Attachment::new("r1", "https://img/r1.png");
        let value = serde_json::to_value(&attachment).unwrap();
        assert_eq!(value["remoteId"], "r1");
        assert!(value.get("displayName").is_none());
    }
}
