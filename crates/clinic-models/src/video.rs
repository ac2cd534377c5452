//! Video and exercise-video models
//!
//! Both are link listings; the video itself stays on the hosting provider.

use std::fmt;

use chrono::{DateTime, Utc};
use clinic_core::traits::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attachment::Attachment;

/// Hosting provider of a video link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoKind {
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "google-drive")]
    GoogleDrive,
}

impl VideoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoKind::YouTube => "youtube",
            VideoKind::GoogleDrive => "google-drive",
        }
    }
}

impl fmt::Display for VideoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video listing (YouTube only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,
    pub title: String,
    pub url: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(title: String, url: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Video {
    const COLLECTION: &'static str = "videos";
    const TYPE_NAME: &'static str = "Video";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Exercise video listing with an optional uploaded thumbnail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseVideo {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,
    pub title: String,
    pub url: String,
    pub video_type: VideoKind,
    pub slug: String,
    #[serde(default)]
    pub thumbnail: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExerciseVideo {
    pub fn new(title: String, url: String, video_type: VideoKind, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            video_type,
            slug,
            thumbnail: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for ExerciseVideo {
    const COLLECTION: &'static str = "exercise_videos";
    const TYPE_NAME: &'static str = "Exercise video";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Video creation input, shared by both listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Video update input, shared by both listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_kind_wire_names() {
        assert_eq!(serde_json::to_string(&VideoKind::GoogleDrive).unwrap(), "\"google-drive\"");
        let kind: VideoKind = serde_json::from_str("\"youtube\"").unwrap();
        assert_eq!(kind, VideoKind::YouTube);
    }
}
