//! # clinic-attachments
//!
//! Attachment handling for the clinic backend. Binary files never touch the
//! document store; they are uploaded to an external image host and resources
//! keep only the returned identifier and URL.
//!
//! ## Features
//!
//! - [`AttachmentGateway`] abstraction over the image host
//! - Cloudinary-compatible HTTP gateway and an in-memory gateway
//! - [`AttachmentLifecycle`]: upload before write, best-effort release,
//!   delete-then-upload replacement
//!
//! ## Example
//!
//! ```rust,ignore
//! use clinic_attachments::{AttachmentLifecycle, FileUpload, MemoryGateway};
//! use std::sync::Arc;
//!
//! let lifecycle = AttachmentLifecycle::new(Arc::new(MemoryGateway::new()));
//! let photo = lifecycle
//!     .upload(&FileUpload::new("portrait.jpg", bytes), "clinic/profiles")
//!     .await?;
//! ```

pub mod cloudinary;
pub mod gateway;
pub mod lifecycle;
pub mod memory;

pub use cloudinary::CloudinaryGateway;
pub use gateway::{
    AttachmentGateway, DestroyOutcome, FileUpload, GatewayError, GatewayResult, UploadedAsset,
};
pub use lifecycle::{AttachmentLifecycle, UploadPolicy};
pub use memory::{GatewayCall, MemoryGateway};
