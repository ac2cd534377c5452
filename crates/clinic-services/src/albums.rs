//! Photo album service

use std::sync::Arc;

use clinic_attachments::{AttachmentLifecycle, FileUpload};
use clinic_contracts::albums::{CreateAlbumContract, UpdateAlbumContract};
use clinic_core::result::ClinicResult;
use clinic_core::traits::Document;
use clinic_db::DocumentStore;
use clinic_models::{Album, AlbumChanges, NewAlbum};
use tracing::{info, instrument, warn};

use crate::base::{apply_order, available_slug, find_or_404, parse_id, present, validate};

const IMAGES_FIELD: &str = "images";

#[derive(Clone)]
pub struct AlbumService {
    albums: Arc<dyn DocumentStore<Album>>,
    attachments: AttachmentLifecycle,
    folder: String,
}

impl AlbumService {
    pub fn new(
        albums: Arc<dyn DocumentStore<Album>>,
        attachments: AttachmentLifecycle,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            albums,
            attachments,
            folder: folder.into(),
        }
    }

    /// Create an album from a name and at least one image. Images are
    /// uploaded concurrently and all must succeed before the album is stored.
    #[instrument(skip_all, fields(name = ?input.name, images = images.len()))]
    pub async fn create(&self, input: NewAlbum, images: Vec<FileUpload>) -> ClinicResult<Album> {
        validate(
            &CreateAlbumContract {
                image_count: images.len(),
            },
            &input,
        )?;
        self.attachments.check(IMAGES_FIELD, &images)?;

        let name = present(input.name).unwrap_or_default();
        let slug = available_slug(self.albums.as_ref(), &name, None).await?;

        let uploaded = self.attachments.upload_all(&images, &self.folder).await?;
        let album = Album::new(name, slug, uploaded);

        if let Err(e) = self.albums.insert(&album).await {
            self.attachments.release_all(&album.images).await;
            return Err(e.into());
        }

        info!(album_id = %album.id, slug = %album.slug, images = album.images.len(), "Album created");
        Ok(album)
    }

    pub async fn list(&self) -> ClinicResult<Vec<Album>> {
        Ok(self.albums.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> ClinicResult<Album> {
        find_or_404(self.albums.as_ref(), parse_id::<Album>(id)?).await
    }

    /// Rename, remove images, append new images and reorder images.
    ///
    /// Removed images are released only after the album no longer
    /// references them.
    #[instrument(skip(self, changes, new_images))]
    pub async fn update(
        &self,
        id: &str,
        changes: AlbumChanges,
        new_images: Vec<FileUpload>,
    ) -> ClinicResult<Album> {
        let mut album = self.get(id).await?;
        validate(&UpdateAlbumContract, &changes)?;
        self.attachments.check(IMAGES_FIELD, &new_images)?;

        if let Some(name) = present(changes.name) {
            if name != album.name {
                album.slug = available_slug(self.albums.as_ref(), &name, Some(album.id)).await?;
                album.name = name;
            }
        }

        let added = self.attachments.upload_all(&new_images, &self.folder).await?;

        let removed = album.remove_images(&changes.removed_images);
        album.images.extend(added.iter().cloned());
        if !changes.new_image_order.is_empty() {
            album.order_images(&changes.new_image_order);
        }
        album.touch();

        if let Err(e) = self.albums.update(&album).await {
            self.attachments.release_all(&added).await;
            return Err(e.into());
        }

        let released = self.attachments.release_all(&removed).await;
        if released < removed.len() {
            warn!(
                album_id = %album.id,
                orphaned = removed.len() - released,
                "Removed album images left on the image host"
            );
        }

        info!(
            album_id = %album.id,
            added = added.len(),
            removed = removed.len(),
            "Album updated"
        );
        Ok(album)
    }

    /// Delete the album after releasing its images best effort
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ClinicResult<Album> {
        let album = self.get(id).await?;

        let released = self.attachments.release_all(&album.images).await;
        if released < album.images.len() {
            warn!(
                album_id = %album.id,
                orphaned = album.images.len() - released,
                "Album images left on the image host"
            );
        }

        self.albums.delete(album.id).await?;
        info!(album_id = %album.id, "Album deleted");
        Ok(album)
    }

    pub async fn reorder(&self, order: &[String]) -> ClinicResult<()> {
        apply_order(self.albums.as_ref(), order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{photo, Harness};
    use clinic_attachments::MemoryGateway;

    fn named(name: &str) -> NewAlbum {
        NewAlbum {
            name: Some(name.into()),
        }
    }

    #[tokio::test]
    async fn test_create_requires_images() {
        let h = Harness::new();
        let err = h
            .services
            .albums
            .create(named("Camp"), Vec::new())
            .await
            .unwrap_err();
        assert!(err.public_message().contains("At least one image is required"));
    }

    #[tokio::test]
    async fn test_create_describes_images() {
        let h = Harness::new();
        let album = h
            .services
            .albums
            .create(named("Free Camp 2024"), vec![photo("a.jpg"), photo("b.jpg")])
            .await
            .unwrap();

        assert_eq!(album.slug, "free-camp-2024");
        assert_eq!(album.images.len(), 2);
        assert_eq!(album.images[0].display_name.as_deref(), Some("a.jpg"));
    }

    #[tokio::test]
    async fn test_partial_upload_failure_writes_nothing() {
        let h = Harness::with_gateway(MemoryGateway::new().fail_uploads_after(1));
        let result = h
            .services
            .albums
            .create(named("Camp"), vec![photo("a.jpg"), photo("b.jpg")])
            .await;

        assert!(result.is_err());
        assert_eq!(h.stores.albums.count().await.unwrap(), 0);
        assert_eq!(h.gateway.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let h = Harness::new();
        h.services
            .albums
            .create(named("Camp"), vec![photo("a.jpg")])
            .await
            .unwrap();

        let err = h
            .services
            .albums
            .create(named("camp"), vec![photo("b.jpg")])
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(h.gateway.stored_count(), 1);
    }

    #[tokio::test]
    async fn test_update_rename_remove_append_order() {
        let h = Harness::new();
        let album = h
            .services
            .albums
            .create(named("Camp"), vec![photo("a.jpg"), photo("b.jpg")])
            .await
            .unwrap();
        let a = album.images[0].remote_id.clone();
        let b = album.images[1].remote_id.clone();

        let changes = AlbumChanges {
            name: Some("Winter Camp".into()),
            removed_images: vec![a.clone()],
            new_image_order: Vec::new(),
        };
        let updated = h
            .services
            .albums
            .update(&album.id.to_string(), changes, vec![photo("c.jpg")])
            .await
            .unwrap();

        assert_eq!(updated.slug, "winter-camp");
        assert_eq!(updated.images.len(), 2);
        assert_eq!(updated.images[0].remote_id, b);
        assert!(!h.gateway.contains(&a));

        let c = updated.images[1].remote_id.clone();
        let reordered = h
            .services
            .albums
            .update(
                &album.id.to_string(),
                AlbumChanges {
                    new_image_order: vec![c.clone(), b.clone()],
                    ..Default::default()
                },
                Vec::new(),
            )
            .await
            .unwrap();
        assert_eq!(reordered.images[0].remote_id, c);
    }

    #[tokio::test]
    async fn test_delete_releases_every_image() {
        let h = Harness::new();
        let album = h
            .services
            .albums
            .create(named("Camp"), vec![photo("a.jpg"), photo("b.jpg"), photo("c.jpg")])
            .await
            .unwrap();

        h.services.albums.delete(&album.id.to_string()).await.unwrap();
        assert_eq!(h.gateway.destroy_calls().len(), 3);
        assert_eq!(h.stores.albums.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reorder_is_idempotent() {
        let h = Harness::new();
        let first = h
            .services
            .albums
            .create(named("One"), vec![photo("a.jpg")])
            .await
            .unwrap();
        let second = h
            .services
            .albums
            .create(named("Two"), vec![photo("b.jpg")])
            .await
            .unwrap();

        let order = vec![second.id.to_string(), first.id.to_string()];
        h.services.albums.reorder(&order).await.unwrap();
        let once: Vec<_> = h.services.albums.list().await.unwrap().iter().map(|a| a.id).collect();
        h.services.albums.reorder(&order).await.unwrap();
        let twice: Vec<_> = h.services.albums.list().await.unwrap().iter().map(|a| a.id).collect();

        assert_eq!(once, vec![second.id, first.id]);
        assert_eq!(once, twice);
    }
}
