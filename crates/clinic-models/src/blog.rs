//! Blog post model

use chrono::{DateTime, Utc};
use clinic_core::traits::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::attachment::Attachment;

/// Blog post entity
///
/// `category` references a treatment. Author fields are copied from the
/// writer's doctor profile when the post is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub cover_photo: Vec<Attachment>,
    pub category: DocumentId,
    /// Rich-text editor document, stored as submitted
    pub editor_data: Value,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn new(
        title: String,
        slug: String,
        category: DocumentId,
        editor_data: Value,
        author_name: String,
        author_image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            cover_photo: Vec::new(),
            category,
            editor_data,
            author_name,
            author_image,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for BlogPost {
    const COLLECTION: &'static str = "blog_posts";
    const TYPE_NAME: &'static str = "Blog post";

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

/// Blog post creation input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: Option<String>,
    #[serde(alias = "categoryId")]
    pub category: Option<String>,
    pub editor_data: Option<Value>,
}

/// Blog post edit input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "categoryId")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_data: Option<Value>,
    /// Drop the current cover without replacing it
    #[serde(default)]
    pub remove_cover_image: bool,
}
