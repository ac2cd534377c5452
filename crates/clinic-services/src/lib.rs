//! # clinic-services
//!
//! Resource services for the clinic backend.
//!
//! Each service runs the same sequence: validate the input, check that the
//! addressed and referenced records exist, upload new attachments, write the
//! document, then release attachments the document no longer references.
//! Validation and not-found failures happen before anything is uploaded or
//! written.

pub mod albums;
pub mod appointments;
pub mod base;
pub mod blogs;
pub mod profiles;
pub mod treatments;
pub mod videos;

use std::sync::Arc;

use clinic_attachments::AttachmentLifecycle;
use clinic_core::config::GatewayFolders;
use clinic_db::Stores;
use clinic_notifications::AppointmentMailer;

pub use albums::AlbumService;
pub use appointments::AppointmentService;
pub use blogs::BlogService;
pub use profiles::ProfileService;
pub use treatments::TreatmentService;
pub use videos::{ExerciseVideoService, VideoService};

/// Every resource service, wired to one set of stores
#[derive(Clone)]
pub struct ClinicServices {
    pub profiles: ProfileService,
    pub appointments: AppointmentService,
    pub albums: AlbumService,
    pub blogs: BlogService,
    pub treatments: TreatmentService,
    pub videos: VideoService,
    pub exercise_videos: ExerciseVideoService,
    stores: Stores,
}

impl ClinicServices {
    pub fn new(
        stores: Stores,
        attachments: AttachmentLifecycle,
        mailer: Arc<AppointmentMailer>,
        folders: &GatewayFolders,
    ) -> Self {
        Self {
            profiles: ProfileService::new(
                stores.profiles.clone(),
                attachments.clone(),
                folders.profiles.clone(),
            ),
            appointments: AppointmentService::new(
                stores.appointments.clone(),
                stores.profiles.clone(),
                mailer,
            ),
            albums: AlbumService::new(
                stores.albums.clone(),
                attachments.clone(),
                folders.albums.clone(),
            ),
            blogs: BlogService::new(
                stores.blog_posts.clone(),
                stores.treatments.clone(),
                stores.profiles.clone(),
                attachments.clone(),
                folders.blog_covers.clone(),
            ),
            treatments: TreatmentService::new(stores.treatments.clone(), stores.blog_posts.clone()),
            videos: VideoService::new(stores.videos.clone()),
            exercise_videos: ExerciseVideoService::new(
                stores.exercise_videos.clone(),
                attachments,
                folders.exercise_videos.clone(),
            ),
            stores,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }
}
