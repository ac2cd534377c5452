//! Photo album model

use chrono::{DateTime, Utc};
use clinic_core::traits::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attachment::Attachment;

/// Photo album entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,
    pub name: String,
    pub slug: String,
    /// Images in display order
    pub images: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Album {
    pub fn new(name: String, slug: String, images: Vec<Attachment>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            images,
            created_at: now,
            updated_at: now,
        }
    }

    /// Drop images by remote id, returning the removed ones
    pub fn remove_images(&mut self, remote_ids: &[String]) -> Vec<Attachment> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.images)
            .into_iter()
            .partition(|img| remote_ids.contains(&img.remote_id));
        self.images = kept;
        removed
    }

    /// Reorder images by remote id. Listed images come first in the given
    /// order; the rest keep their relative order after them.
    pub fn order_images(&mut self, remote_ids: &[String]) {
        let mut remaining = std::mem::take(&mut self.images);
        let mut ordered = Vec::with_capacity(remaining.len());
        for id in remote_ids {
            if let Some(pos) = remaining.iter().position(|img| &img.remote_id == id) {
                ordered.push(remaining.remove(pos));
            }
        }
        ordered.extend(remaining);
        self.images = ordered;
    }
}

impl Document for Album {
    const COLLECTION: &'static str = "albums";
    const TYPE_NAME: &'static str = "Album";

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

/// Album creation input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    pub name: Option<String>,
}

/// Album update input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remote ids of images to remove
    #[serde(default)]
    pub removed_images: Vec<String>,
    /// Remote ids in the desired display order
    #[serde(default)]
    pub new_image_order: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album() -> Album {
        Album::new(
            "Camp".into(),
            "camp".into(),
            vec![
                Attachment::new("a", "u/a"),
                Attachment::new("b", "u/b"),
                Attachment::new("c", "u/c"),
            ],
        )
    }

    fn ids(album: &Album) -> Vec<&str> {
        album.images.iter().map(|i| i.remote_id.as_str()).collect()
    }

    #[test]
    fn test_remove_images() {
        let mut album = album();
        let removed = album.remove_images(&["b".to_string(), "zzz".to_string()]);
        assert_eq!(removed.len(), 1);
        assert_eq!(ids(&album), vec!["a", "c"]);
    }

    #[test]
    fn test_order_images_keeps_unlisted_after() {
        let mut album = album();
        album.order_images(&["c".to_string(), "a".to_string()]);
        assert_eq!(ids(&album), vec!["c", "a", "b"]);

        album.order_images(&["c".to_string(), "a".to_string()]);
        assert_eq!(ids(&album), vec!["c", "a", "b"]);
    }
}
