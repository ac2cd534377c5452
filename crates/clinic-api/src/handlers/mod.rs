//! API handlers

pub mod albums;
pub mod appointments;
pub mod blogs;
pub mod exercise_videos;
pub mod profiles;
pub mod treatments;
pub mod videos;

use serde::{Deserialize, Serialize};

/// Confirmation body for deletes and reorders
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of the collection reorder endpoints.
///
/// The admin panel used to post whole records under a per-collection key;
/// those arrays are still accepted and reduced to their ids.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(
        alias = "reorderedVideos",
        alias = "reorderedExerciseVideos",
        alias = "reorderedBlogs",
        alias = "reorderedAlbums"
    )]
    order: Vec<OrderEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrderEntry {
    Id(String),
    Record {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl ReorderRequest {
    pub fn ids(self) -> Vec<String> {
        self.order
            .into_iter()
            .map(|entry| match entry {
                OrderEntry::Id(id) | OrderEntry::Record { id } => id,
            })
            .collect()
    }
}
