//! # clinic-models
//!
//! Domain models for the clinic backend.
//!
//! Every stored resource implements [`clinic_core::Document`]. Input types
//! (`New*`, `*Changes`) carry raw request values; the contracts crate decides
//! whether they are acceptable.

pub use clinic_core::traits::{Document, DocumentId};

pub mod album;
pub mod appointment;
pub mod attachment;
pub mod blog;
pub mod profile;
pub mod role;
pub mod treatment;
pub mod video;

pub use album::{Album, AlbumChanges, NewAlbum};
pub use appointment::{Appointment, NewAppointment};
pub use attachment::Attachment;
pub use blog::{BlogChanges, BlogPost, NewBlogPost};
pub use profile::{Chamber, ChamberInput, NewProfile, Profile, ProfileChanges};
pub use role::Role;
pub use treatment::{NewTreatment, Treatment, TreatmentChanges};
pub use video::{ExerciseVideo, NewVideo, Video, VideoChanges, VideoKind};
