//! Doctor profile service

use std::sync::Arc;

use chrono::{Datelike, Utc};
use clinic_attachments::{AttachmentLifecycle, FileUpload};
use clinic_contracts::profiles::{CreateProfileContract, UpdateProfileContract};
use clinic_core::error::ClinicError;
use clinic_core::result::ClinicResult;
use clinic_core::traits::Document;
use clinic_db::DocumentStore;
use clinic_models::{ChamberInput, NewProfile, Profile, ProfileChanges};
use tracing::{info, instrument, warn};

use crate::base::{find_or_404, parse_id, validate};

const PHOTO_FIELD: &str = "profilePhoto";

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn DocumentStore<Profile>>,
    attachments: AttachmentLifecycle,
    folder: String,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn DocumentStore<Profile>>,
        attachments: AttachmentLifecycle,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            profiles,
            attachments,
            folder: folder.into(),
        }
    }

    #[instrument(skip_all, fields(name = ?input.name))]
    pub async fn create(
        &self,
        input: NewProfile,
        photo: Option<FileUpload>,
    ) -> ClinicResult<Profile> {
        validate(&CreateProfileContract, &input)?;
        if let Some(file) = &photo {
            self.attachments.check(PHOTO_FIELD, std::slice::from_ref(file))?;
        }

        let photos = match &photo {
            Some(file) => vec![self.attachments.upload(file, &self.folder).await?],
            None => Vec::new(),
        };

        let chambers = input
            .chambers
            .iter()
            .cloned()
            .map(ChamberInput::into_chamber)
            .collect();
        let profile = Profile::from_input(input, chambers, photos);

        if let Err(e) = self.profiles.insert(&profile).await {
            self.attachments.release_all(&profile.profile_photo).await;
            return Err(e.into());
        }

        info!(profile_id = %profile.id, "Profile created");
        Ok(profile)
    }

    pub async fn list(&self) -> ClinicResult<Vec<Profile>> {
        Ok(self.profiles.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> ClinicResult<Profile> {
        find_or_404(self.profiles.as_ref(), parse_id::<Profile>(id)?).await
    }

    /// Doctors with a chamber consulting on `weekday` (0 = Sunday), today when absent
    pub async fn available_on(&self, weekday: Option<u8>) -> ClinicResult<Vec<Profile>> {
        let day = match weekday {
            Some(day) if day <= 6 => day,
            Some(_) => return Err(ClinicError::invalid("day", "Day must be between 0 and 6")),
            None => Utc::now().weekday().num_days_from_sunday() as u8,
        };

        let profiles = self.profiles.find_all().await?;
        Ok(profiles.into_iter().filter(|p| p.available_on(day)).collect())
    }

    /// Apply field changes; a new photo replaces the current one
    #[instrument(skip(self, changes, photo))]
    pub async fn update(
        &self,
        id: &str,
        changes: ProfileChanges,
        photo: Option<FileUpload>,
    ) -> ClinicResult<Profile> {
        let mut profile = self.get(id).await?;
        validate(&UpdateProfileContract, &changes)?;
        if let Some(file) = &photo {
            self.attachments.check(PHOTO_FIELD, std::slice::from_ref(file))?;
        }

        changes.apply_to(&mut profile);

        if let Some(file) = &photo {
            let previous = std::mem::take(&mut profile.profile_photo);
            for old in previous.iter().skip(1) {
                self.attachments.release(old).await;
            }
            let replacement = self
                .attachments
                .replace(previous.first(), file, &self.folder)
                .await?;
            profile.profile_photo = vec![replacement];
        }

        profile.touch();
        self.profiles.update(&profile).await?;
        info!(profile_id = %profile.id, "Profile updated");
        Ok(profile)
    }

    /// Remove the profile; its photos are released best effort first
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ClinicResult<Profile> {
        let profile = self.get(id).await?;

        let released = self.attachments.release_all(&profile.profile_photo).await;
        if released < profile.profile_photo.len() {
            warn!(
                profile_id = %profile.id,
                orphaned = profile.profile_photo.len() - released,
                "Profile photo left on the image host"
            );
        }

        self.profiles.delete(profile.id).await?;
        info!(profile_id = %profile.id, "Profile deleted");
        Ok(profile)
    }
}
